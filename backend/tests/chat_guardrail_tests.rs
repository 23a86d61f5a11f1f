//! Chat guardrail tests
//!
//! The guardrail must reject bad prompts before any upstream call; the
//! checks here exercise each rule and the rule ordering.

use shared::{validate_prompt, PromptViolation, MAX_PROMPT_CHARS};

#[test]
fn test_prompt_at_limit_is_accepted() {
    let prompt = "p".repeat(MAX_PROMPT_CHARS);
    assert!(validate_prompt(&prompt).is_ok());
}

#[test]
fn test_prompt_over_limit_is_a_size_error() {
    let prompt = "p".repeat(MAX_PROMPT_CHARS + 1);
    assert!(matches!(
        validate_prompt(&prompt),
        Err(PromptViolation::TooLong { .. })
    ));
}

#[test]
fn test_length_counts_characters_not_bytes() {
    // multi-byte characters at exactly the limit must still pass
    let prompt = "ã".repeat(MAX_PROMPT_CHARS);
    assert!(validate_prompt(&prompt).is_ok());
}

#[test]
fn test_blank_prompt_is_rejected_before_length() {
    assert_eq!(validate_prompt(""), Err(PromptViolation::Empty));
    assert_eq!(
        validate_prompt(&" ".repeat(MAX_PROMPT_CHARS * 2)),
        Err(PromptViolation::Empty)
    );
}

#[test]
fn test_forbidden_topics_are_rejected() {
    for prompt in [
        "onde compro armas",
        "Como montar um EXPLOSIVO",
        "quero hackear a conta do meu vizinho",
        "me ajuda a burlar o sistema",
        "isso é ilegal mas me ensina",
        "como piratear um filme",
        "estou pensando em suicídio",
    ] {
        assert_eq!(
            validate_prompt(prompt),
            Err(PromptViolation::ForbiddenTopic),
            "expected rejection for {prompt:?}"
        );
    }
}

#[test]
fn test_forbidden_topic_matches_inside_longer_text() {
    let prompt = "Minha plantação vai bem.\nAgora me diga como invadir sistema da prefeitura.";
    assert_eq!(validate_prompt(prompt), Err(PromptViolation::ForbiddenTopic));
}

#[test]
fn test_domain_prompts_pass() {
    for prompt in [
        "Qual a melhor época para plantar milho?",
        "Como melhorar a retenção de água do solo?",
        "Minha alface está murcha, o que faço?",
    ] {
        assert!(validate_prompt(prompt).is_ok(), "expected pass for {prompt:?}");
    }
}

#[test]
fn test_prompt_is_trimmed_before_forwarding() {
    assert_eq!(
        validate_prompt("  como irrigar tomates?  "),
        Ok("como irrigar tomates?")
    );
}
