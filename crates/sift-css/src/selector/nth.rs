//! [§ 14.4.4 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
//!
//! "The :nth-child(An+B) pseudo-class notation represents elements that
//! are among An+Bth elements from the list composed of their inclusive
//! siblings."

/// A parsed `An+B` rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Nth {
    /// Step.
    pub a: i64,
    /// Offset.
    pub b: i64,
}

impl Nth {
    /// `odd`, the same as `2n+1`.
    pub const ODD: Self = Self::new(2, 1);
    /// `even`, the same as `2n`.
    pub const EVEN: Self = Self::new(2, 0);
    /// The rule every unparseable argument resolves to. It matches nothing.
    pub const NEVER: Self = Self::new(0, 0);

    /// Build a rule from its two coefficients.
    #[must_use]
    pub const fn new(a: i64, b: i64) -> Self {
        Self { a, b }
    }

    /// Parse a pseudo-class argument.
    ///
    /// A plain integer `k` (sign allowed, no whitespace) is `0n+k`. Anything
    /// else is trimmed and lower-cased, then read as `odd`, `even`,
    /// `[+-]?\d*n(\s*[+-]\s*\d+)?` or `[+-]?\s*\d+`; the last form is
    /// `1n+k`. Whatever fails to parse becomes [`Nth::NEVER`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if let Ok(b) = value.parse::<i64>() {
            return Self::new(0, b);
        }
        let value = value.trim().to_lowercase();
        match value.as_str() {
            "odd" => Self::ODD,
            "even" => Self::EVEN,
            other => parse_an_plus_b(other).unwrap_or(Self::NEVER),
        }
    }

    /// Whether the 1-based position `n` is selected.
    ///
    /// "The value a can be negative, but only the positive values of
    /// an+b, for n ≥ 0, may represent an element in the document tree."
    ///
    /// The arithmetic is widened so extreme coefficients never overflow.
    #[must_use]
    pub fn matches(self, n: i64) -> bool {
        if self.a == 0 {
            return n == self.b;
        }
        let d = i128::from(n) - i128::from(self.b);
        let a = i128::from(self.a);
        d % a == 0 && d / a >= 0
    }
}

fn split_sign(s: &str) -> (Option<i64>, &str) {
    if let Some(rest) = s.strip_prefix('+') {
        (Some(1), rest)
    } else if let Some(rest) = s.strip_prefix('-') {
        (Some(-1), rest)
    } else {
        (None, s)
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    s.split_at(len)
}

fn parse_an_plus_b(value: &str) -> Option<Nth> {
    let (sign, rest) = split_sign(value);
    let (digits, rest) = split_digits(rest);

    let Some(after_n) = rest.strip_prefix('n') else {
        // [+-]?\s*\d+
        let (_, unsigned) = split_sign(value);
        let unsigned = if sign.is_some() {
            unsigned.trim_start()
        } else {
            unsigned
        };
        let (digits, tail) = split_digits(unsigned);
        if digits.is_empty() || !tail.is_empty() {
            return None;
        }
        return Some(Nth::new(1, sign.unwrap_or(1) * digits.parse::<i64>().ok()?));
    };

    let a = if digits.is_empty() {
        sign.unwrap_or(1)
    } else {
        sign.unwrap_or(1) * digits.parse::<i64>().ok()?
    };

    let after_n = after_n.trim_start();
    if after_n.is_empty() {
        return Some(Nth::new(a, 0));
    }
    let (Some(b_sign), rest) = split_sign(after_n) else {
        return None;
    };
    let (digits, tail) = split_digits(rest.trim_start());
    if digits.is_empty() || !tail.is_empty() {
        return None;
    }
    Some(Nth::new(a, b_sign * digits.parse::<i64>().ok()?))
}
