//! Comma-separated selection lists.

/// Expand a comma-separated selection against the full set `all`.
///
/// Names keep the order they are first mentioned in. The keyword `all`
/// inserts every member of `all` not yet selected, in the caller's order.
/// Duplicates are dropped.
///
/// ```
/// use tpbuild_probe::parse_list;
///
/// assert_eq!(parse_list("a,all,b", &["a", "b", "c"]), ["a", "b", "c"]);
/// ```
pub fn parse_list<S: AsRef<str>>(s: &str, all: &[S]) -> Vec<String> {
  let mut selected: Vec<String> = Vec::new();

  if s.is_empty() {
    return selected;
  }

  let mut push = |name: &str| {
    if !selected.iter().any(|seen| seen == name) {
      selected.push(name.to_string());
    }
  };

  for name in s.split(',') {
    if name == "all" {
      all.iter().for_each(|member| push(member.as_ref()));
    } else {
      push(name);
    }
  }

  selected
}
