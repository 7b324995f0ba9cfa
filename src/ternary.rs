/// Shorthand for `if c { a } else { b }`.  `cargo fmt` spreads a
/// nested `if` expression over a dozen lines; the seam step table
/// reads better as two lines of `cq!`.
#[macro_export]
macro_rules! cq {
    ($condition: expr, $_true: expr, $_false: expr) => {
        if $condition {
            $_true
        } else {
            $_false
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn picks_a_branch() {
        assert_eq!(cq!(1 < 2, "yes", "no"), "yes");
        assert_eq!(cq!(2 < 1, "yes", "no"), "no");
    }
}
