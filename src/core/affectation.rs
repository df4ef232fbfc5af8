use std::fmt;

/// Default code for items subject to IGV (gravado).
pub const TAXABLE_CODE: &str = "10";
/// Default code for items exempt from IGV (exonerado).
pub const EXEMPT_CODE: &str = "20";

/// IGV treatment of a line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affectation {
    /// Unit price includes IGV
    Taxable,
    /// Unit price is taken at face value
    Exempt,
}

impl Affectation {
    pub fn display_name(self) -> &'static str {
        match self {
            Affectation::Taxable => "Gravado",
            Affectation::Exempt => "Exonerado",
        }
    }
}

impl fmt::Display for Affectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Vocabulary mapping affectation codes to their treatment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffectationCodes {
    pub taxable: String,
    pub exempt: String,
}

impl Default for AffectationCodes {
    fn default() -> Self {
        AffectationCodes {
            taxable: TAXABLE_CODE.to_string(),
            exempt: EXEMPT_CODE.to_string(),
        }
    }
}

impl AffectationCodes {
    /// Unrecognized codes map to `None`.
    pub fn classify(&self, code: &str) -> Option<Affectation> {
        let code = code.trim();
        if code == self.taxable {
            Some(Affectation::Taxable)
        } else if code == self.exempt {
            Some(Affectation::Exempt)
        } else {
            None
        }
    }
}
