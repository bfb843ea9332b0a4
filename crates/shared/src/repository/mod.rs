mod order;
mod refresh_token;
mod reset_token;
mod spot;
mod user;
mod vehicle;
mod verification;

pub use self::order::{OrderCommandRepository, OrderQueryRepository, OrderRepository};
pub use self::refresh_token::RefreshTokenRepository;
pub use self::reset_token::ResetTokenRepository;
pub use self::spot::{SpotCommandRepository, SpotQueryRepository, SpotRepository};
pub use self::user::{UserCommandRepository, UserQueryRepository, UserRepository};
pub use self::vehicle::VehicleRepository;
pub use self::verification::VerificationRepository;

/// `%input%` for `ILIKE ... ESCAPE '\'`, with `%`, `_` and `\` in the input matched literally.
pub(crate) fn contains_pattern(input: &str) -> String {
    let mut pattern = String::with_capacity(input.len() + 2);
    pattern.push('%');
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// A page past the end carries no window count; only then is a separate count needed.
pub(crate) fn needs_total_count(rows_on_page: usize, offset: i64) -> bool {
    rows_on_page == 0 && offset > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(contains_pattern("mg road"), "%mg road%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn counts_separately_only_past_the_end() {
        assert!(needs_total_count(0, 20));
        assert!(!needs_total_count(0, 0));
        assert!(!needs_total_count(3, 20));
    }
}
