//! Small utility helpers used across modules.

use unicode_normalization::UnicodeNormalization;

/// Normalize a free-text answer for comparison.
///
/// NFD-decomposes, drops combining diacritical marks (U+0300..U+036F), drops
/// punctuation, symbols and underscores, collapses whitespace runs, trims and
/// lowercases. `"  São   Paulo "` becomes `"sao paulo"`.
pub fn normalize_answer(s: &str) -> String {
  let stripped: String = s
    .nfd()
    .filter(|c| !('\u{0300}'..='\u{036F}').contains(c))
    .filter(|c| c.is_alphanumeric() || c.is_whitespace())
    .collect();
  stripped
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

/// Format an integer with comma thousands separators, e.g. `1234567` -> `"1,234,567"`.
pub fn format_thousands(n: u64) -> String {
  let digits = n.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(ch);
  }
  out
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge upstream payloads.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) { cut -= 1; }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}
