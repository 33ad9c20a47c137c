use once_cell::sync::Lazy;

/// One known standards body: a description-substring matcher plus the
/// name/url/image used for enrichment.
#[derive(Debug, Clone)]
pub struct StandardsBody {
    pub name: &'static str,
    /// Substring matched case-insensitively against the description
    pub matcher: &'static str,
    pub url: &'static str,
    pub image: &'static str,
}

static KNOWN_BODIES: Lazy<Vec<StandardsBody>> = Lazy::new(|| {
    vec![
        StandardsBody {
            name: "ISO",
            matcher: "iso",
            url: "https://www.iso.org/standards.html",
            image: "/images/standards/iso.svg",
        },
        StandardsBody {
            name: "ASTM International",
            matcher: "astm",
            url: "https://www.astm.org/products-services/standards-and-publications.html",
            image: "/images/standards/astm.svg",
        },
        StandardsBody {
            name: "DIN",
            matcher: "din",
            url: "https://www.din.de/en",
            image: "/images/standards/din.svg",
        },
        StandardsBody {
            name: "IEC",
            matcher: "iec",
            url: "https://www.iec.ch/homepage",
            image: "/images/standards/iec.svg",
        },
        StandardsBody {
            name: "UL",
            matcher: "ul 9",
            url: "https://www.ul.com/services/standards",
            image: "/images/standards/ul.svg",
        },
        StandardsBody {
            name: "RoHS",
            matcher: "rohs",
            url: "https://environment.ec.europa.eu/topics/waste-and-recycling/rohs-directive_en",
            image: "/images/standards/rohs.svg",
        },
        StandardsBody {
            name: "REACH",
            matcher: "reach",
            url: "https://echa.europa.eu/regulations/reach/understanding-reach",
            image: "/images/standards/reach.svg",
        },
        StandardsBody {
            name: "FDA",
            matcher: "fda",
            url: "https://www.fda.gov/industry",
            image: "/images/standards/fda.svg",
        },
    ]
});

/// Find the first known body whose matcher occurs in the description.
/// Table order is precedence order.
pub fn find_body(description: &str) -> Option<&'static StandardsBody> {
    let haystack = description.to_lowercase();
    KNOWN_BODIES.iter().find(|body| haystack.contains(body.matcher))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let body = find_body("Certified to Iso 9001 quality management").unwrap();
        assert_eq!(body.name, "ISO");
    }

    #[test]
    fn test_no_match() {
        assert!(find_body("internal factory acceptance test").is_none());
    }

    #[test]
    fn test_astm_match() {
        let body = find_body("ASTM D638 tensile testing").unwrap();
        assert_eq!(body.name, "ASTM International");
    }
}
