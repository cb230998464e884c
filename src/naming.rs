//! Naming conventions shared by every layer.
//!
//! Notes are addressed by POSIX-style relative paths ending in `.md`. The
//! URL-facing slug of a note is that path with the extension stripped:
//!
//! - `DSA/Arrays.md` → slug `DSA/Arrays` → URL `/docs/DSA/Arrays/`
//! - `Database/NoSQL/README.md` → slug `Database/NoSQL/README`
//!
//! Folder names are displayed through [`format_category_name`], which splits
//! CamelCase and hyphenated names into words.

/// Markdown file extension, including the dot.
pub const MARKDOWN_EXT: &str = ".md";

/// Name of the file that stands in for its folder.
pub const README: &str = "README";

/// URL prefix under which every note is served.
pub const DOCS_PREFIX: &str = "/docs";

/// Turn a category folder name into a display label.
///
/// Inserts a space before every internal capital letter (one not already
/// following a hyphen or space), turns hyphens into spaces, uppercases the
/// first character and trims:
///
/// - `"ComputerNetworks"` → `"Computer Networks"`
/// - `"DevOps"` → `"Dev Ops"`
/// - `"Terraform-vs-Ansible"` → `"Terraform vs Ansible"`
///
/// Runs of capitals are split letter by letter (`"IOSystems"` →
/// `"I O Systems"`). Existing labels depend on this spacing, so acronyms are
/// not special-cased.
pub fn format_category_name(name: &str) -> String {
    let mut spaced = String::with_capacity(name.len() + 8);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        // A capital right after a separator already starts a word.
        let after_separator = matches!(prev, None | Some(' ') | Some('-'));
        if c.is_ascii_uppercase() && !after_separator {
            spaced.push(' ');
        }
        spaced.push(c);
        prev = Some(c);
    }

    let mut chars = spaced.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };

    capitalized.replace('-', " ").trim().to_string()
}

/// Strip the markdown extension from a content path.
///
/// Paths without the extension are returned unchanged.
pub fn slug_for_path(path: &str) -> &str {
    path.strip_suffix(MARKDOWN_EXT).unwrap_or(path)
}

/// Site URL of a note (`DSA/Arrays.md` → `/docs/DSA/Arrays/`).
pub fn href_for_path(path: &str) -> String {
    format!("{}/{}/", DOCS_PREFIX, slug_for_path(path))
}

/// Site URL of a folder (`["Database", "NoSQL"]` → `/docs/Database/NoSQL/`).
pub fn href_for_folder(parts: &[&str]) -> String {
    format!("{}/{}/", DOCS_PREFIX, parts.join("/"))
}

/// Title used when a note has no `# heading`.
///
/// The final path segment with the markdown extension stripped, or `None`
/// when the path has no usable final segment.
pub fn fallback_title(path: &str) -> Option<String> {
    let last = path.rsplit('/').next()?;
    let stem = slug_for_path(last);
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

/// Split a URL slug into its non-empty segments.
pub fn slug_segments(slug: &str) -> Vec<&str> {
    slug.split('/').filter(|s| !s.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_camel_case() {
        assert_eq!(format_category_name("ComputerNetworks"), "Computer Networks");
        assert_eq!(format_category_name("OperatingSystems"), "Operating Systems");
    }

    #[test]
    fn category_two_word_acronym_quirk() {
        assert_eq!(format_category_name("DevOps"), "Dev Ops");
    }

    #[test]
    fn category_hyphens_become_spaces() {
        assert_eq!(
            format_category_name("Terraform-vs-Ansible"),
            "Terraform vs Ansible"
        );
    }

    #[test]
    fn category_consecutive_capitals_each_spaced() {
        assert_eq!(format_category_name("IOSystems"), "I O Systems");
        assert_eq!(format_category_name("DSA"), "D S A");
    }

    #[test]
    fn category_lowercase_first_letter_uppercased() {
        assert_eq!(format_category_name("zshrc"), "Zshrc");
    }

    #[test]
    fn category_empty() {
        assert_eq!(format_category_name(""), "");
    }

    #[test]
    fn slug_strips_extension() {
        assert_eq!(slug_for_path("DSA/Arrays.md"), "DSA/Arrays");
        assert_eq!(slug_for_path("WebDev/Express.js.md"), "WebDev/Express.js");
        assert_eq!(slug_for_path("no-extension"), "no-extension");
    }

    #[test]
    fn hrefs() {
        assert_eq!(href_for_path("DSA/Arrays.md"), "/docs/DSA/Arrays/");
        assert_eq!(href_for_folder(&["Database", "NoSQL"]), "/docs/Database/NoSQL/");
    }

    #[test]
    fn fallback_title_from_file_name() {
        assert_eq!(fallback_title("DSA/Arrays.md").as_deref(), Some("Arrays"));
        assert_eq!(fallback_title("notes.md").as_deref(), Some("notes"));
        assert_eq!(fallback_title("DSA/"), None);
        assert_eq!(fallback_title(""), None);
    }

    #[test]
    fn segments_skip_empty() {
        assert_eq!(slug_segments("/DSA//Arrays/"), vec!["DSA", "Arrays"]);
        assert!(slug_segments("").is_empty());
    }
}
