//! Review prompt construction for the AI reviewer.

use std::fmt::Write;

use crate::config::Criterion;
use crate::host::ReviewContext;

/// Build the full review prompt for a change.
///
/// Lays out change metadata, the commit message, every file diff, the
/// criteria catalogue, and the exact JSON response structure the reviewer
/// must produce.
pub fn build_review_prompt(context: &ReviewContext) -> String {
    let mut prompt = String::new();

    let _ = write!(
        prompt,
        "You are an expert code reviewer with extensive experience in software development, \
         security, and best practices. Analyze the following code changes and provide a \
         comprehensive review based on the specified criteria.\n\n\
         ## Code Change Information\n\
         **Project**: {}\n\
         **Branch**: {}\n\
         **Author**: {}\n\
         **Subject**: {}\n\
         **Files Changed**: {}\n\
         **Lines Changed**: {}\n\n\
         ## Commit Message\n```\n{}\n```\n\n\
         ## Code Changes (Diffs)\n",
        context.change.project,
        context.change.branch,
        context.change.owner,
        context.change.subject,
        context.file_count,
        context.total_lines_changed,
        context.commit_message,
    );

    for (file_path, diff) in &context.files_diff {
        let _ = write!(prompt, "\n### File: `{file_path}`\n```diff\n{diff}\n```\n");
    }

    prompt.push_str(
        "\n## Review Criteria\n\
         Please analyze the code changes against each of the following criteria and provide:\n\
         1. A score from 1-10 (10 being excellent, 1 being poor)\n\
         2. Detailed feedback explaining your assessment\n\
         3. Specific suggestions for improvement\n\n",
    );

    for criterion in Criterion::ALL {
        let _ = writeln!(
            prompt,
            "**{}**: {}",
            criterion.label(),
            criterion.description()
        );
    }

    prompt.push_str(
        "\n## Response Format\n\
         Respond with a valid JSON object following this exact structure:\n\n\
         ```json\n{\n  \"overall_score\": <float between 1-10>,\n\
           \"overall_feedback\": \"<comprehensive summary of the review>\",\n\
           \"criteria_scores\": {\n",
    );

    let criteria_lines: Vec<String> = Criterion::ALL
        .iter()
        .map(|criterion| {
            format!(
                "    \"{}\": {{\"score\": <1-10>, \"feedback\": \"<detailed feedback>\", \
                 \"suggestions\": [\"<suggestion1>\", \"<suggestion2>\"]}}",
                criterion.key()
            )
        })
        .collect();
    prompt.push_str(&criteria_lines.join(",\n"));

    prompt.push_str(
        "\n  },\n\
           \"summary\": {\n\
             \"strengths\": [\"<strength1>\", \"<strength2>\"],\n\
             \"weaknesses\": [\"<weakness1>\", \"<weakness2>\"],\n\
             \"critical_issues\": [\"<issue1>\", \"<issue2>\"],\n\
             \"recommendations\": [\"<recommendation1>\", \"<recommendation2>\"]\n\
           },\n\
           \"approval_recommendation\": \"<APPROVE|NEEDS_WORK|REJECT>\",\n\
           \"confidence_level\": <float between 0-1>\n}\n```\n\n\
         ## Important Guidelines\n\
         - Be thorough but concise in your feedback\n\
         - Focus on actionable suggestions\n\
         - Consider security implications carefully\n\
         - Evaluate code maintainability and readability\n\
         - Check for adherence to best practices\n\
         - Identify potential performance issues\n\
         - Look for proper error handling\n\
         - Assess test coverage implications\n\
         - Consider the broader impact of changes\n\n\
         Provide your analysis now:\n",
    );

    prompt
}
