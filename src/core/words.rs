//! English cardinal wording of invoice amounts

const ONES: [&str; 20] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
    "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const GROUPS: [(u64, &str); 3] = [
    (1_000_000_000, "Billion"),
    (1_000_000, "Million"),
    (1_000, "Thousand"),
];

/// Spell out a non-negative integer, e.g. 1234 → "One Thousand Two Hundred Thirty Four"
pub fn int_to_words(n: u64) -> String {
    if n < 20 {
        return ONES[n as usize].to_string();
    }

    if n < 100 {
        let tens = TENS[(n / 10) as usize];
        return match n % 10 {
            0 => tens.to_string(),
            ones => format!("{} {}", tens, ONES[ones as usize]),
        };
    }

    if n < 1000 {
        let head = format!("{} Hundred", ONES[(n / 100) as usize]);
        return match n % 100 {
            0 => head,
            rest => format!("{} {}", head, int_to_words(rest)),
        };
    }

    let (group, name) = GROUPS
        .iter()
        .copied()
        .find(|(group, _)| n >= *group)
        .unwrap_or(GROUPS[GROUPS.len() - 1]);

    let head = format!("{} {}", int_to_words(n / group), name);
    match n % group {
        0 => head,
        rest => format!("{} {}", head, int_to_words(rest)),
    }
}

/// Amounts at or above this have more whole dollars than `u64` holds
const AMOUNT_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Split an amount into whole dollars and rounded cents
///
/// Cents are rounded half-to-even, so a fraction that rounds up to a full
/// dollar is reported as 100 cents rather than carried over. Returns `None`
/// for non-finite amounts and for amounts whose dollars do not fit a `u64`.
pub fn split_amount(amount: f64) -> Option<(u64, u64)> {
    let value = amount.abs();
    if !value.is_finite() || value >= AMOUNT_LIMIT {
        return None;
    }

    let dollars = value.floor();
    let cents = ((value - dollars) * 100.0).round_ties_even();
    Some((dollars as u64, cents as u64))
}

/// Spell out a monetary amount, e.g. 1234.56 → "One Thousand Two Hundred
/// Thirty Four Dollars and Fifty Six Cents"
///
/// The sign is ignored and no singular forms are used ("One Dollars").
/// Returns `None` when [`split_amount`] cannot represent the amount.
pub fn amount_in_words(amount: f64) -> Option<String> {
    let (dollars, cents) = split_amount(amount)?;

    let mut phrase = if dollars == 0 {
        "Zero Dollars".to_string()
    } else {
        format!("{} Dollars", int_to_words(dollars))
    };

    if cents > 0 {
        phrase.push_str(&format!(" and {} Cents", int_to_words(cents)));
    }

    Some(phrase)
}
