// src/utils/html.rs

/// Cleans user-supplied HTML (task descriptions) with ammonia.
///
/// Safe formatting tags such as <p> and <b> survive; <script>, <style>
/// and event-handler attributes are removed along with their content.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
