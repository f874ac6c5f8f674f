use serde::{Deserialize, Serialize};
use specta::Type;
use thiserror::Error;
use url::{Host, Url};

#[derive(Debug, Serialize, Deserialize, Type, Clone, PartialEq)]
pub enum LinkType {
    Internal,
    External,
    Mailto,
    Tel,
    Unknown,
}

#[derive(Debug, Serialize, Deserialize, Type, Clone)]
pub struct Link {
    pub href: String,
    pub path: String,
    pub link_type: LinkType,
}

#[derive(Debug, Error)]
pub enum LinkParseError {
    #[error("Failed to parse link: {0}")]
    LinkParseError(String),
    #[error("Failed to parse URL: {0}")]
    UrlParseError(String),
}

/// Resolves `link` against `base_url` and classifies it.
///
/// Links are internal when they share the registrable domain of the base
/// (`blog.example.co.uk` and `www.example.co.uk` are the same site). Fragment
/// only and `javascript:` hrefs classify as [`LinkType::Unknown`].
pub fn parse_link(link: &str, base_url: &Url) -> Result<Link, LinkParseError> {
    let link = link.trim();
    if link.is_empty() || link.starts_with('#') {
        return Ok(Link {
            href: link.to_string(),
            path: String::new(),
            link_type: LinkType::Unknown,
        });
    }

    let resolved = base_url
        .join(link)
        .map_err(|e| LinkParseError::LinkParseError(format!("{link}: {e}")))?;

    let link_type = match resolved.scheme() {
        "mailto" => LinkType::Mailto,
        "tel" => LinkType::Tel,
        "http" | "https" => {
            if same_site(&resolved, base_url) {
                LinkType::Internal
            } else {
                LinkType::External
            }
        }
        _ => LinkType::Unknown,
    };

    Ok(Link {
        href: resolved.to_string(),
        path: resolved.path().to_string(),
        link_type,
    })
}

/// The registrable domain (`example.co.uk`) of a URL, falling back to the
/// bare host for IPs, `localhost` and other names outside the public suffix
/// list.
pub fn registrable_domain(url: &Url) -> Option<String> {
    let host = match url.host()? {
        Host::Domain(domain) => domain.trim_end_matches('.').to_ascii_lowercase(),
        ip => return Some(ip.to_string()),
    };
    let domain = psl::domain_str(&host)
        .map(str::to_string)
        .unwrap_or_else(|| host.clone());
    Some(domain)
}

pub fn same_site(link: &Url, base_url: &Url) -> bool {
    match (registrable_domain(link), registrable_domain(base_url)) {
        (Some(link_domain), Some(base_domain)) => link_domain == base_domain,
        _ => false,
    }
}

pub fn parse_base_url(url: &str) -> Result<Url, LinkParseError> {
    Url::parse(url).map_err(|e| LinkParseError::UrlParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn test_parse_link() {
        let link = parse_link("https://www.google.com", &base("https://www.google.com")).unwrap();
        assert_eq!(link.href, "https://www.google.com/");
        assert_eq!(link.path, "/");
        assert_eq!(link.link_type, LinkType::Internal);

        let link = parse_link("/sample", &base("http://localhost:3000")).unwrap();
        assert_eq!(link.href, "http://localhost:3000/sample");
        assert_eq!(link.path, "/sample");
        assert_eq!(link.link_type, LinkType::Internal);
    }

    #[test]
    fn test_parse_link_external() {
        let link = parse_link("https://www.google.com", &base("http://localhost:3000")).unwrap();
        assert_eq!(link.href, "https://www.google.com/");
        assert_eq!(link.link_type, LinkType::External);
    }

    #[test]
    fn test_parse_link_subdomain_is_internal() {
        let link = parse_link(
            "https://blog.example.co.uk/post",
            &base("https://www.example.co.uk/"),
        )
        .unwrap();
        assert_eq!(link.link_type, LinkType::Internal);

        let link = parse_link("https://other.co.uk/", &base("https://www.example.co.uk/")).unwrap();
        assert_eq!(link.link_type, LinkType::External);
    }

    #[test]
    fn test_parse_link_mailto() {
        let link = parse_link("mailto:test@example.com", &base("http://localhost:3000")).unwrap();
        assert_eq!(link.href, "mailto:test@example.com");
        assert_eq!(link.link_type, LinkType::Mailto);
    }

    #[test]
    fn test_parse_link_tel() {
        let link = parse_link("tel:1234567890", &base("http://localhost:3000")).unwrap();
        assert_eq!(link.href, "tel:1234567890");
        assert_eq!(link.link_type, LinkType::Tel);
    }

    #[test]
    fn test_parse_link_fragment_and_script() {
        let fragment = parse_link("#top", &base("https://example.com")).unwrap();
        assert_eq!(fragment.link_type, LinkType::Unknown);

        let script = parse_link("javascript:void(0)", &base("https://example.com")).unwrap();
        assert_eq!(script.link_type, LinkType::Unknown);
    }
}
