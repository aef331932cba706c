//! RFC 8288 `Link` header handling

use std::fmt;

/// A single link relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub uri: String,
    pub rel: String,
    /// Further attributes such as `type`, in order
    pub params: Vec<(String, String)>,
}

impl Link {
    pub fn new(rel: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            rel: rel.into(),
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }
}

/// Ordered list of links, unique by `rel`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkHeader {
    links: Vec<Link>,
}

impl LinkHeader {
    #[must_use]
    pub const fn new() -> Self {
        Self { links: Vec::new() }
    }

    /// Parse a header value; malformed entries are skipped
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let mut header = Self::new();
        let mut rest = value;
        while let Some(start) = rest.find('<') {
            let Some(end) = rest[start..].find('>').map(|i| start + i) else {
                break;
            };
            let uri = &rest[start + 1..end];
            let (attrs, tail) = split_once_unquoted(&rest[end + 1..], ',');
            rest = tail;

            let mut rel = None;
            let mut params = Vec::new();
            let mut attrs = attrs;
            while !attrs.is_empty() {
                let (attr, tail) = split_once_unquoted(attrs, ';');
                attrs = tail;
                let attr = attr.trim();
                if attr.is_empty() {
                    continue;
                }
                let (name, value) = attr.split_once('=').unwrap_or((attr, ""));
                let name = name.trim().to_ascii_lowercase();
                let value = value.trim().trim_matches('"').to_string();
                if name == "rel" {
                    rel = Some(value);
                } else {
                    params.push((name, value));
                }
            }
            if let Some(rel) = rel {
                header.set(Link {
                    uri: uri.to_string(),
                    rel,
                    params,
                });
            }
        }
        header
    }

    /// Add a link, replacing any existing one with the same `rel`
    pub fn set(&mut self, link: Link) {
        match self.links.iter_mut().find(|l| l.rel == link.rel) {
            Some(existing) => *existing = link,
            None => self.links.push(link),
        }
    }

    #[must_use]
    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.rel == rel)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Split at the first `sep` outside of a quoted string
fn split_once_unquoted(s: &str, sep: char) -> (&str, &str) {
    let mut quoted = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => quoted = !quoted,
            c if c == sep && !quoted => return (&s[..i], &s[i + c.len_utf8()..]),
            _ => {},
        }
    }
    (s, "")
}

impl fmt::Display for LinkHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, link) in self.links.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "<{}>; rel=\"{}\"", link.uri, link.rel)?;
            for (name, value) in &link.params {
                write!(f, "; {name}=\"{value}\"")?;
            }
        }
        Ok(())
    }
}
