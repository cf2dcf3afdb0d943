use std::ops::Range;

fn lowered(needle: &str) -> Vec<char> {
    needle.chars().flat_map(char::to_lowercase).collect()
}

// Returned lengths are in bytes of `hay`, not of the lowercased needle.
fn prefix_match_len(hay: &str, needle: &[char]) -> Option<usize> {
    let mut rest = needle;
    for (i, c) in hay.char_indices() {
        if rest.is_empty() {
            return Some(i);
        }
        for lc in c.to_lowercase() {
            match rest.split_first() {
                Some((&n, tail)) if n == lc => rest = tail,
                _ => return None,
            }
        }
    }
    rest.is_empty().then_some(hay.len())
}

pub fn find_ci(hay: &str, needle: &str) -> Option<Range<usize>> {
    let needle = lowered(needle);
    if needle.is_empty() {
        return None;
    }
    hay.char_indices().find_map(|(start, _)| {
        prefix_match_len(&hay[start..], &needle).map(|len| start..start + len)
    })
}

pub fn rfind_ci(hay: &str, needle: &str) -> Option<Range<usize>> {
    let needle = lowered(needle);
    if needle.is_empty() {
        return None;
    }
    hay.char_indices().rev().find_map(|(start, _)| {
        prefix_match_len(&hay[start..], &needle).map(|len| start..start + len)
    })
}

pub fn contains_ci(hay: &str, needle: &str) -> bool {
    find_ci(hay, needle).is_some()
}
