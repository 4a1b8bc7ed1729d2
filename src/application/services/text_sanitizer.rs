/// Postgres text columns cannot hold `\0`; client and collaborator text goes
/// through here before it is recorded.
pub fn strip_nul(text: String) -> String {
    if text.contains('\0') {
        text.replace('\0', "")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_nul() {
        assert_eq!(strip_nul("bad\0name.pdf".to_string()), "badname.pdf");
        assert_eq!(strip_nul("\0\0".to_string()), "");
        assert_eq!(strip_nul("plain".to_string()), "plain");
    }
}
