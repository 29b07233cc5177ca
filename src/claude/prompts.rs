use crate::bug::Comment;

/// Build the prompt asking Claude to summarize a bug's comment thread
pub fn bug_comments_prompt(bug_key: &str, comments: &[Comment]) -> String {
    let comments_text = comments
        .iter()
        .map(|c| format!("**{}** ({}):\n{}", c.author, c.created, c.body))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"You are analyzing Jira bug comments. Summarize the following comments for bug {bug_key}.

Focus on:
- Root cause identified
- Solutions attempted
- Current status/blockers
- Action items

Comments:
{comments_text}

Provide a concise summary in 3-5 bullet points."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(author: &str, created: &str, body: &str) -> Comment {
        Comment {
            author: author.to_string(),
            created: created.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_prompt_layout() {
        let prompt = bug_comments_prompt(
            "QA-12",
            &[
                comment("Ada", "2024-04-01T09:00:00.000+0000", "Fails on Safari only"),
                comment("Grace", "2024-04-02T10:00:00.000+0000", "Root cause is the\ncookie flag"),
            ],
        );

        assert!(prompt.starts_with(
            "You are analyzing Jira bug comments. Summarize the following comments for bug QA-12."
        ));
        assert!(prompt.contains("- Root cause identified\n- Solutions attempted\n"));
        assert!(prompt.contains(
            "Comments:\n**Ada** (2024-04-01T09:00:00.000+0000):\nFails on Safari only\n\n\
             **Grace** (2024-04-02T10:00:00.000+0000):\nRoot cause is the\ncookie flag\n\n"
        ));
        assert!(prompt.ends_with("Provide a concise summary in 3-5 bullet points."));
    }
}
