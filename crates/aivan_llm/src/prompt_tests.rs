use assert_matches::assert_matches;
use indoc::indoc;
use pretty_assertions::assert_eq;
use test_log::test;

use super::{instructions::*, *};
use crate::{Error, conversation::Turn};

const MODEL: &str = "gemini-2.5-flash";

#[test]
fn test_plain_prompt_is_sent_verbatim() {
    let request = GenerationRequest::new("Build a portfolio site.", MODEL);
    let payload = PromptBuilder::default().assemble(&request, vec![]);

    assert_eq!(payload.parts, vec![ContentPart::Text(
        "Build a portfolio site.".to_owned()
    )]);
    assert_eq!(payload.text(), "Build a portfolio site.");
}

#[test]
fn test_current_code_precedes_prompt() {
    let code = "<html><body>v1</body></html>";
    let request = GenerationRequest::new("Make the title red.", MODEL).with_current_code(code);

    let payload = PromptBuilder::default().assemble(&request, vec![]);
    let text = payload.text();

    assert!(text.starts_with(CURRENT_CODE_LABEL));
    assert!(text.contains(&format!("```\n{code}\n```")));
    assert!(text.ends_with("Make the title red."));
    assert!(text.find(code).unwrap() < text.find("Make the title red.").unwrap());
}

#[test]
fn test_empty_current_code_is_ignored() {
    let request = GenerationRequest::new("Hello", MODEL).with_current_code("");
    let payload = PromptBuilder::default().assemble(&request, vec![]);

    assert_eq!(payload.text(), "Hello");
}

#[test]
fn test_history_and_code_layout() {
    let history = History::from(vec![
        Turn::user("Make a bakery site."),
        Turn::assistant("Here it is."),
    ]);

    let text = user_text("Add a menu.", &history, Some("<p>bakery</p>"));

    assert_eq!(text, indoc! {"
        Conversation history:
        User: Make a bakery site.
        Assistant: Here it is.

        New request:
        [CURRENT CODE]
        (The user is viewing this version right now. Every change you make must be based on this code):
        ```
        <p>bakery</p>
        ```

        Add a menu."
    });
}

#[test]
fn test_attachments_follow_text_part() {
    let request = GenerationRequest::new("Use this logo.", MODEL);
    let image = ContentPart::InlineData {
        mime_type: "image/png".to_owned(),
        data: "aGVsbG8=".to_owned(),
    };

    let payload = PromptBuilder::default().assemble(&request, vec![image.clone()]);

    assert_eq!(payload.parts, vec![
        ContentPart::Text("Use this logo.".to_owned()),
        image
    ]);
}

#[test]
fn test_free_tier_creator_includes_ads_and_disclosure() {
    let request = GenerationRequest::new("Build a blog.", MODEL);
    let payload = PromptBuilder::default().assemble(&request, vec![]);
    let instruction = &payload.system_instruction;

    assert!(instruction.starts_with(BASE_PERSONA));
    assert!(instruction.contains(CREATOR_REFUSAL));
    assert!(instruction.contains(DISCLOSURE));
    for marker in ["AD OPTION 1", "AD OPTION 2", "AD OPTION 3"] {
        assert!(instruction.contains(marker), "missing {marker}");
    }
    assert!(instruction.contains("ANTI-DELETION PROTOCOL"));
    assert!(instruction.contains("ANTI-DOORWAY SITE POLICY"));
}

#[test]
fn test_premium_creator_has_no_ads() {
    let request = GenerationRequest::new("Build a blog.", MODEL).with_premium(true);
    let payload = PromptBuilder::default().assemble(&request, vec![]);
    let instruction = &payload.system_instruction;

    assert!(instruction.contains(CREATOR_REFUSAL));
    assert!(!instruction.contains(DISCLOSURE));
    assert!(!instruction.contains("AD OPTION"));
}

#[test]
fn test_question_mode_never_has_ads() {
    for premium in [false, true] {
        let instruction = system_instruction(ChatMode::Question, premium);

        assert_eq!(instruction, format!("{BASE_PERSONA}{QUESTION}"));
        assert!(!instruction.contains(DISCLOSURE));
    }
}

#[test]
fn test_researcher_mode() {
    let request = GenerationRequest::new("Design a dashboard.", MODEL).with_mode(ChatMode::Researcher);
    let payload = PromptBuilder::default().assemble(&request, vec![]);

    assert_eq!(payload.system_instruction, format!("{BASE_PERSONA}{RESEARCHER}"));
}

#[test]
fn test_researcher_alias_selects_researcher_persona() {
    let builder = PromptBuilder::default();
    let request = GenerationRequest::new("Design a dashboard.", DEFAULT_RESEARCHER_ALIAS)
        .with_mode(ChatMode::Creator);

    assert_eq!(builder.effective_mode(&request), ChatMode::Researcher);

    let payload = builder.assemble(&request, vec![]);
    assert!(payload.system_instruction.ends_with(RESEARCHER));
    assert!(!payload.system_instruction.contains(DISCLOSURE));
}

#[test]
fn test_custom_researcher_alias() {
    let builder = PromptBuilder::new("deep-designer");

    let request = GenerationRequest::new("x", "deep-designer");
    assert_eq!(builder.effective_mode(&request), ChatMode::Researcher);

    let request = GenerationRequest::new("x", DEFAULT_RESEARCHER_ALIAS);
    assert_eq!(builder.effective_mode(&request), ChatMode::Creator);
}

#[test(tokio::test)]
async fn test_build_resolves_attachments() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "hello").unwrap();

    let request = GenerationRequest::new("Summarize.", MODEL).with_attachment(Attachment::new(&path));
    let payload = PromptBuilder::default().build(&request).await.unwrap();

    assert_eq!(payload.parts.len(), 2);
    assert_eq!(payload.parts[1], ContentPart::InlineData {
        mime_type: "text/plain".to_owned(),
        data: "aGVsbG8=".to_owned(),
    });
}

#[test(tokio::test)]
async fn test_build_fails_on_unreadable_attachment() {
    let request = GenerationRequest::new("Summarize.", MODEL)
        .with_attachment(Attachment::new("/definitely/not/here.txt"));

    let error = PromptBuilder::default().build(&request).await.unwrap_err();
    assert_matches!(error, Error::Attachment { .. });
}
