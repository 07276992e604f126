/// Sanitizes free-form rich text (test descriptions) with ammonia's default
/// whitelist: safe formatting tags survive, `<script>`, event handlers and
/// similar are stripped.
pub fn clean_rich_text(input: &str) -> String {
    ammonia::clean(input)
}
