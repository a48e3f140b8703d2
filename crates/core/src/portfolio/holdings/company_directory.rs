//! Static security code -> company name lookup.

use std::collections::HashMap;

use super::Holding;
use crate::constants::UNKNOWN_COMPANY_LABEL;

const BUILT_IN_COMPANIES: &[(u32, &str)] = &[
    (1952, "新日本空調"),
    (3097, "物語コーポレーション"),
    (7203, "トヨタ自動車"),
    (8876, "リログループ"),
    (9432, "日本電信電話"),
];

/// Maps security codes to display names, falling back to a fixed label.
#[derive(Debug, Clone)]
pub struct CompanyDirectory {
    names: HashMap<u32, String>,
}

impl Default for CompanyDirectory {
    fn default() -> Self {
        Self {
            names: BUILT_IN_COMPANIES
                .iter()
                .map(|(code, name)| (*code, name.to_string()))
                .collect(),
        }
    }
}

impl CompanyDirectory {
    pub fn empty() -> Self {
        Self {
            names: HashMap::new(),
        }
    }

    pub fn insert(&mut self, security_code: u32, name: impl Into<String>) {
        self.names.insert(security_code, name.into());
    }

    /// Directory name for a code, or the unknown-company label.
    pub fn lookup(&self, security_code: u32) -> &str {
        self.names
            .get(&security_code)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_COMPANY_LABEL)
    }

    /// A holding's own name wins over the directory entry.
    pub fn display_name(&self, holding: &Holding) -> String {
        holding
            .company_name
            .clone()
            .unwrap_or_else(|| self.lookup(holding.security_code).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_known_codes() {
        let directory = CompanyDirectory::default();
        assert_eq!(directory.lookup(3097), "物語コーポレーション");
        assert_eq!(directory.lookup(1952), "新日本空調");
        assert_eq!(directory.lookup(8876), "リログループ");
    }

    #[test]
    fn test_unmapped_code_falls_back() {
        let directory = CompanyDirectory::default();
        assert_eq!(directory.lookup(1), UNKNOWN_COMPANY_LABEL);
        assert_eq!(CompanyDirectory::empty().lookup(3097), UNKNOWN_COMPANY_LABEL);
    }

    #[test]
    fn test_holding_name_overrides_directory() {
        let directory = CompanyDirectory::default();
        let holding = Holding::new(3097, dec!(3230), 100).with_company_name("Monogatari Corp");
        assert_eq!(directory.display_name(&holding), "Monogatari Corp");

        let holding = Holding::new(4444, dec!(100), 1);
        assert_eq!(directory.display_name(&holding), UNKNOWN_COMPANY_LABEL);
    }

    #[test]
    fn test_insert() {
        let mut directory = CompanyDirectory::empty();
        directory.insert(4444, "Test Holdings");
        assert_eq!(directory.lookup(4444), "Test Holdings");
    }
}
