use std::{ops::Range, sync::Arc};
use swkbd_core::{KeyboardConfig, Validator};

/// Keystroke filter for the keyboard's text field.
///
/// Mirrors the platform text-field filter contract: every proposed edit
/// replaces `dest[dstart..dend]` with `source[start..end]`. Returning `None`
/// accepts the edit as proposed, returning `Some(text)` replaces the
/// proposal with `text`. A rejected edit yields the original
/// `dest[dstart..dend]`, so the field stays unchanged.
///
/// All indices count characters. Out of range indices are clamped.
#[derive(Clone)]
pub struct InputFilter {
    config: Arc<KeyboardConfig>,
    validator: Arc<dyn Validator>,
}

impl InputFilter {
    #[must_use]
    pub fn filter(
        &self,
        source: &str,
        start: usize,
        end: usize,
        dest: &str,
        dstart: usize,
        dend: usize,
    ) -> Option<String> {
        let inserted = &source[byte_range(source, start, end)];
        let replaced = byte_range(dest, dstart, dend);

        let mut text = String::with_capacity(dest.len() + inserted.len());
        text.push_str(&dest[..replaced.start]);
        text.push_str(inserted);
        text.push_str(&dest[replaced.end..]);

        if self.validator.validate_filters(&self.config, &text).is_valid() {
            None
        } else {
            Some(dest[replaced].to_owned())
        }
    }

    #[must_use]
    pub fn new(config: Arc<KeyboardConfig>, validator: Arc<dyn Validator>) -> Self {
        Self { config, validator }
    }
}

fn byte_offset(s: &str, index: usize) -> usize {
    s.char_indices().nth(index).map_or(s.len(), |(offset, _)| offset)
}

fn byte_range(s: &str, start: usize, end: usize) -> Range<usize> {
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    byte_offset(s, lo)..byte_offset(s, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use swkbd_core::{ButtonConfig, ConfigValidator, Filters};

    fn no_at_filter() -> InputFilter {
        let config = KeyboardConfig::new(ButtonConfig::Single)
            .with_max_text_length(8)
            .with_filters(Filters {
                prevent_at: true,
                ..Filters::default()
            });
        InputFilter::new(Arc::new(config), Arc::new(ConfigValidator::new()))
    }

    #[test]
    fn disallowed_insertion_keeps_field() {
        let filter = no_at_filter();
        assert_eq!(filter.filter("@", 0, 1, "ABC", 3, 3), Some(String::new()));
    }

    #[test]
    fn allowed_insertion_is_accepted() {
        let filter = no_at_filter();
        assert_eq!(filter.filter("D", 0, 1, "ABC", 3, 3), None);
    }

    #[test]
    fn rejected_replacement_returns_original_span() {
        let filter = no_at_filter();
        assert_eq!(filter.filter("x@y", 0, 3, "ABCD", 1, 3), Some("BC".to_owned()));
        assert_eq!(filter.filter("x@y", 0, 1, "ABCD", 1, 3), None);
    }

    #[test]
    fn deleting_an_offending_character_is_allowed() {
        // Filters only look at the resulting text.
        let filter = no_at_filter();
        assert_eq!(filter.filter("", 0, 0, "A@B", 1, 2), None);
    }

    #[test]
    fn indices_count_characters() {
        let filter = no_at_filter();
        assert_eq!(filter.filter("@", 0, 1, "ñandú", 5, 5), Some(String::new()));
        assert_eq!(filter.filter("ö", 0, 1, "ñandú", 2, 3), None);
        assert_eq!(filter.filter("@", 0, 1, "ñandú", 1, 4), Some("and".to_owned()));
    }

    #[test]
    fn out_of_range_indices_are_clamped() {
        let filter = no_at_filter();
        assert_eq!(filter.filter("@", 0, 9, "AB", 7, 4), Some(String::new()));
        assert_eq!(filter.filter("@", 3, 0, "AB", 2, 0), Some("AB".to_owned()));
    }
}
