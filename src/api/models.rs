/// Query string of `GET /api/domains`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DomainsParams {
    pub query: Option<String>,
    pub tld: Option<String>,
}

impl DomainsParams {
    /// Repeated keys keep their first value, unknown keys are ignored.
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut params = DomainsParams::default();
        let Some(raw) = raw else {
            return params;
        };

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "query" => &mut params.query,
                "tld" => &mut params.tld,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_first_value_wins() {
        let params = DomainsParams::from_query(Some("query=abc&tld=com&query=def&tld=net"));
        assert_eq!(params.query.as_deref(), Some("abc"));
        assert_eq!(params.tld.as_deref(), Some("com"));
    }

    #[test]
    fn test_from_query_decodes_and_ignores_unknown() {
        let params = DomainsParams::from_query(Some("page=2&query=my%20site+now"));
        assert_eq!(params.query.as_deref(), Some("my site now"));
        assert_eq!(params.tld, None);

        assert_eq!(DomainsParams::from_query(None), DomainsParams::default());
    }
}
