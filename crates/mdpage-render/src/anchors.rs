use std::collections::HashMap;

use mdpage_model::{GroupKind, Page};
use unicode_general_category::{get_general_category, GeneralCategory};

use crate::title::{enriched_title, TitleStyle};

/// Every in-document link target starts with this marker. Headings begin
/// with a prefix symbol that the slug filter drops, leaving the hyphen
/// produced by the following space.
pub const ANCHOR_PREFIX: &str = "#-";

/// Characters kept in a slug besides letters, digits and hyphens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnchorStyle {
    /// Letters, digits and hyphens only.
    #[default]
    Strict,
    /// Also keep `_`, matching documents produced by older releases.
    KeepUnderscores,
}

impl AnchorStyle {
    fn keeps(self, ch: char) -> bool {
        is_letter_or_digit(ch) || ch == '-' || (ch == '_' && self == AnchorStyle::KeepUnderscores)
    }
}

/// Letters (`L*`) and decimal digits (`Nd`). Letter numbers such as `Ⅻ` and
/// other numbers such as `²` or `½` are not digits.
fn is_letter_or_digit(ch: char) -> bool {
    matches!(
        get_general_category(ch),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::DecimalNumber
    )
}

/// Lowercase, trim, hyphenate spaces, then drop everything outside the alphabet.
pub fn slugify(text: &str, style: AnchorStyle) -> String {
    let lowered = text.trim().to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        let ch = if ch == ' ' { '-' } else { ch };
        if style.keeps(ch) {
            slug.push(ch);
        }
    }
    slug
}

/// Link target for the heading whose visible text is `text`.
pub fn anchor(text: &str, style: AnchorStyle) -> String {
    let slug = slugify(text, style);
    let mut target = String::with_capacity(ANCHOR_PREFIX.len() + slug.len());
    target.push_str(ANCHOR_PREFIX);
    target.push_str(&slug);
    target
}

/// Where an anchor in the summary points to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnchorOwner {
    Entry { group: usize, entry: usize },
    Group { group: usize },
}

/// Summary link target claimed by more than one heading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateAnchor {
    pub anchor: String,
    pub first: AnchorOwner,
    pub duplicate: AnchorOwner,
}

/// Report link targets that collide. No suffixes are generated for
/// duplicates, so every later owner of an anchor is unreachable from the
/// summary.
pub fn find_duplicate_anchors(page: &Page, style: AnchorStyle) -> Vec<DuplicateAnchor> {
    let mut seen: HashMap<String, AnchorOwner> = HashMap::new();
    let mut duplicates = Vec::new();

    let mut claim = |target: String, owner: AnchorOwner| match seen.get(&target) {
        Some(first) => duplicates.push(DuplicateAnchor {
            anchor: target,
            first: first.clone(),
            duplicate: owner,
        }),
        None => {
            seen.insert(target, owner);
        }
    };

    for (group_idx, group) in page.groups.iter().enumerate() {
        match group.kind {
            // an empty list group has no summary link
            GroupKind::List if group.entries.is_empty() => {}
            GroupKind::List => {
                // every entry of a list group links to the group heading
                claim(
                    anchor(&group.title, style),
                    AnchorOwner::Group { group: group_idx },
                );
            }
            GroupKind::Standard => {
                for (entry_idx, entry) in group.entries.iter().enumerate() {
                    let text = enriched_title(entry, TitleStyle::Anchor);
                    claim(
                        anchor(&text, style),
                        AnchorOwner::Entry {
                            group: group_idx,
                            entry: entry_idx,
                        },
                    );
                }
            }
        }
    }

    duplicates
}
