//! Slug derivation for catalog names.
//!
//! Matches the convention the catalog uses for display names: lowercase,
//! accents folded to ASCII, runs of non-alphanumerics collapsed to a single
//! hyphen. "Húng Quế" becomes "hung-que".

/// Derive a URL-safe slug from a display name.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;

    for ch in name.chars() {
        let base = if ch.is_ascii() {
            Some(ch.to_ascii_lowercase())
        } else {
            fold_accent(ch)
        };
        match base {
            Some(ch) if ch.is_ascii_alphanumeric() => {
                if pending_sep && !out.is_empty() {
                    out.push('-');
                }
                pending_sep = false;
                out.push(ch);
            }
            // Separators and unfoldable characters both break a word.
            _ => pending_sep = true,
        }
    }

    out
}

/// Fold common Latin accents to their lowercase ASCII base letter.
///
/// Covers the Vietnamese alphabet plus the usual Latin-1 range.
fn fold_accent(ch: char) -> Option<char> {
    let folded = match ch.to_lowercase().next()? {
        'à' | 'á' | 'ả' | 'ã' | 'ạ' | 'ă' | 'ằ' | 'ắ' | 'ẳ' | 'ẵ' | 'ặ' | 'â' | 'ầ'
        | 'ấ' | 'ẩ' | 'ẫ' | 'ậ' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ẻ' | 'ẽ' | 'ẹ' | 'ê' | 'ề' | 'ế' | 'ể' | 'ễ' | 'ệ' | 'ë' => 'e',
        'ì' | 'í' | 'ỉ' | 'ĩ' | 'ị' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ỏ' | 'õ' | 'ọ' | 'ô' | 'ồ' | 'ố' | 'ổ' | 'ỗ' | 'ộ' | 'ơ' | 'ờ'
        | 'ớ' | 'ở' | 'ỡ' | 'ợ' | 'ö' => 'o',
        'ù' | 'ú' | 'ủ' | 'ũ' | 'ụ' | 'ư' | 'ừ' | 'ứ' | 'ử' | 'ữ' | 'ự' | 'û' | 'ü' => 'u',
        'ỳ' | 'ý' | 'ỷ' | 'ỹ' | 'ỵ' | 'ÿ' => 'y',
        'đ' => 'd',
        'ç' => 'c',
        'ñ' => 'n',
        _ => return None,
    };
    Some(folded)
}
