#[cfg(test)]
mod tests {
    use crate::security::KeySanitizer;

    #[test]
    fn test_plain_key_unchanged() {
        let result = KeySanitizer::sanitize("ui-push@body");
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "ui-push@body");
    }

    #[test]
    fn test_dsl_punctuation_preserved() {
        let result = KeySanitizer::sanitize("player@inv[o].name");
        assert_eq!(result.unwrap(), "player@inv[o].name");

        let result = KeySanitizer::sanitize("msgs@messages[].text#tokenize");
        assert_eq!(result.unwrap(), "msgs@messages[].text#tokenize");
    }

    #[test]
    fn test_forbidden_characters_replaced() {
        let result = KeySanitizer::sanitize(r#"a<b>c:d"e/f\g|h?i*j"#);
        assert_eq!(result.unwrap(), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn test_control_characters_replaced() {
        let result = KeySanitizer::sanitize("tab\there\nnewline");
        assert_eq!(result.unwrap(), "tab_here_newline");
    }

    #[test]
    fn test_custom_replacement() {
        let result = KeySanitizer::sanitize_with_replacement("a/b", '-');
        assert_eq!(result.unwrap(), "a-b");
    }

    #[test]
    fn test_reject_forbidden_replacement() {
        let result = KeySanitizer::sanitize_with_replacement("a/b", '/');
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Replacement"));
    }

    #[test]
    fn test_reject_empty_key() {
        let result = KeySanitizer::sanitize("");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Empty key"));
    }

    #[test]
    fn test_reject_dot_only_key() {
        assert!(KeySanitizer::sanitize(".").is_err());
        assert!(KeySanitizer::sanitize("..").is_err());
    }

    #[test]
    fn test_unicode_preserved() {
        let result = KeySanitizer::sanitize("메뉴@title.text");
        assert_eq!(result.unwrap(), "메뉴@title.text");
    }
}
