//! Content-addressed output file names.
//!
//! Templates use webpack-style placeholders:
//!
//! - `[name]` - logical artifact name
//! - `[chunkhash]`, `[contenthash]`, `[hash]` - hex SHA-256 of the content,
//!   optionally truncated with `[chunkhash:8]`
//! - `[file]` - the emitted file name (source-map templates only)
//!
//! Unknown placeholders are left untouched.

use sha2::{Digest, Sha256};

/// Default number of hex characters kept from the digest.
pub const DEFAULT_HASH_LENGTH: usize = 20;

/// Shortest hash segment a template may ask for.
pub const MIN_HASH_LENGTH: usize = 8;

/// Full hex SHA-256 digest of `content` (64 characters).
pub fn content_hash(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

/// Name an artifact with the default hash length.
///
/// # Example
///
/// ```
/// use weave_bundler::output::name;
///
/// let file = name("main", b"console.log(1)", "[name].[chunkhash].bundle.js");
/// assert!(file.starts_with("main."));
/// assert!(file.ends_with(".bundle.js"));
/// assert_eq!(file, name("main", b"console.log(1)", "[name].[chunkhash].bundle.js"));
/// ```
pub fn name(logical_name: &str, content: &[u8], template: &str) -> String {
    OutputNamer::default().name(logical_name, content, template)
}

/// Derives artifact file names from logical names and content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputNamer {
    hash_length: usize,
}

impl Default for OutputNamer {
    fn default() -> Self {
        Self {
            hash_length: DEFAULT_HASH_LENGTH,
        }
    }
}

impl OutputNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash length used when a placeholder gives none. Clamped to 8..=64.
    pub fn with_hash_length(hash_length: usize) -> Self {
        Self {
            hash_length: clamp_length(hash_length),
        }
    }

    pub fn hash_length(&self) -> usize {
        self.hash_length
    }

    /// Substitute `[name]` and the hash placeholders in `template`.
    pub fn name(&self, logical_name: &str, content: &[u8], template: &str) -> String {
        // Hashing is skipped for templates without a hash placeholder.
        let mut digest: Option<String> = None;

        substitute(template, |token, length| match token {
            "name" if length.is_none() => Some(logical_name.to_string()),
            "chunkhash" | "contenthash" | "hash" => {
                let full = digest.get_or_insert_with(|| content_hash(content));
                let keep = length.map_or(self.hash_length, clamp_length);
                Some(full[..keep].to_string())
            }
            _ => None,
        })
    }

    /// Name of the source map for `file`, e.g. `[file].map`.
    pub fn source_map_name(&self, file: &str, template: &str) -> String {
        substitute(template, |token, length| match token {
            "file" if length.is_none() => Some(file.to_string()),
            _ => None,
        })
    }
}

fn clamp_length(length: usize) -> usize {
    length.clamp(MIN_HASH_LENGTH, 64)
}

/// Replace every `[token]` / `[token:N]` for which `resolve` returns a value.
fn substitute<F>(template: &str, mut resolve: F) -> String
where
    F: FnMut(&str, Option<usize>) -> Option<String>,
{
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let Some(close) = after.find(']') else {
            out.push_str(&rest[open..]);
            return out;
        };

        let inner = &after[..close];
        let (token, length) = match inner.split_once(':') {
            Some((token, digits)) => match digits.parse::<usize>() {
                Ok(length) => (token, Some(length)),
                Err(_) => (inner, None),
            },
            None => (inner, None),
        };

        match resolve(token, length) {
            Some(value) => out.push_str(&value),
            None => {
                out.push('[');
                out.push_str(inner);
                out.push(']');
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}
