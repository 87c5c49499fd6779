use std::collections::HashSet;

const FALLBACK_FREE_PROVIDERS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "aol.com",
    "icloud.com",
    "protonmail.com",
    "mail.com",
    "live.com",
    "gmx.com",
];

pub struct FreeProviderTable {
    domains: HashSet<String>,
}

impl FreeProviderTable {
    pub fn fallback() -> Self {
        Self { domains: FALLBACK_FREE_PROVIDERS.iter().map(|s| s.to_string()).collect() }
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains(domain)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub async fn fetch(source_base: &str) -> Result<Self, String> {
        let url = format!("{source_base}/free-providers.txt");
        let body = reqwest::get(&url)
            .await
            .map_err(|e| e.to_string())?
            .text()
            .await
            .map_err(|e| e.to_string())?;

        let domains: HashSet<String> = body
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .map(|l| l.to_lowercase())
            .collect();

        if domains.is_empty() {
            return Err("fetched free-provider list was empty".into());
        }

        Ok(Self { domains })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_contains_gmail() {
        assert!(FreeProviderTable::fallback().contains("gmail.com"));
    }
}
