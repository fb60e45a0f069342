//! The product listing engine: filter composition, the hybrid
//! cursor/offset pagination controller, and the listing state machine.

pub mod filters;
pub mod pagination;

pub use filters::{ProductFilters, SortOption, DEFAULT_PAGE_SIZE};
pub use pagination::{decide, page_window, ListingState, PageMode, PageParams, PageWindow};

/// Decode a percent-encoded URL segment, mapping `+` to space.
///
/// Category and subcategory names arrive from URL path segments; bad escape
/// sequences pass through literally rather than failing the request.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => match (hex(bytes.get(i + 1)), hex(bytes.get(i + 2))) {
                (Some(hi), Some(lo)) => {
                    out.push(hi * 16 + lo);
                    i += 3;
                }
                _ => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex(byte: Option<&u8>) -> Option<u8> {
    (*byte? as char).to_digit(16).map(|d| d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("mountain%20bikes"), "mountain bikes");
        assert_eq!(percent_decode("road+bikes"), "road bikes");
        assert_eq!(percent_decode("e-bikes"), "e-bikes");
    }

    #[test]
    fn test_percent_decode_bad_escape_passes_through() {
        assert_eq!(percent_decode("50%"), "50%");
        assert_eq!(percent_decode("50%ZZ"), "50%ZZ");
    }

    #[test]
    fn test_percent_decode_utf8() {
        assert_eq!(percent_decode("v%C3%A9lo"), "vélo");
    }
}
