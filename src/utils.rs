use rust_decimal::{Decimal, RoundingStrategy};

pub fn write_csv<I, R, W>(records: I, writer: W) -> anyhow::Result<()>
where
    I: IntoIterator<Item = R>,
    R: serde::Serialize,
    W: std::io::Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records.into_iter() {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Format an amount with thousands separators, e.g. `S/ 1,234.50`
pub fn format_money(symbol: &str, amount: Decimal) -> String {
    let cents = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.2}", cents);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{symbol} {grouped}.{frac_part}")
}

pub fn format_pen(amount: Decimal) -> String {
    format_money("S/", amount)
}

/// Trim trailing zeros from a quantity: 2.5000 -> 2.5
pub fn format_quantity(qty: Decimal) -> String {
    qty.normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_has_two_decimals_and_grouping() {
        assert_eq!(format_pen(dec!(0)), "S/ 0.00");
        assert_eq!(format_pen(dec!(18)), "S/ 18.00");
        assert_eq!(format_pen(dec!(999.5)), "S/ 999.50");
        assert_eq!(format_pen(dec!(1234.56)), "S/ 1,234.56");
        assert_eq!(format_pen(dec!(1234567.891)), "S/ 1,234,567.89");
        assert_eq!(format_money("US$", dec!(-1500)), "-US$ 1,500.00");
    }

    #[test]
    fn quantities_drop_trailing_zeros() {
        assert_eq!(format_quantity(dec!(2.5000)), "2.5");
        assert_eq!(format_quantity(dec!(3.00)), "3");
        assert_eq!(format_quantity(dec!(0.0001)), "0.0001");
    }

    #[test]
    fn csv_writer_emits_header() {
        #[derive(serde::Serialize)]
        struct Row {
            a: u32,
            b: &'static str,
        }
        let mut out = Vec::new();
        write_csv(vec![Row { a: 1, b: "x" }], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a,b\n1,x\n");
    }
}
