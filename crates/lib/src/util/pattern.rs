//! Shell-style wildcard matching for artifact and export patterns.

/// Match `text` against `pattern`, where `*` matches any run of characters
/// (including none) and `?` matches exactly one character. Path separators
/// are ordinary characters, so `src/*` matches `src/a/b.hpp`.
pub fn wildcard_match(pattern: &str, text: &str) -> bool {
  let pattern: Vec<char> = pattern.chars().collect();
  let text: Vec<char> = text.chars().collect();

  let (mut p, mut t) = (0, 0);
  // Position of the last `*` seen and the text index it was tried at.
  let mut backtrack: Option<(usize, usize)> = None;

  while t < text.len() {
    if p < pattern.len() && (pattern[p] == '?' || pattern[p] == text[t]) {
      p += 1;
      t += 1;
    } else if p < pattern.len() && pattern[p] == '*' {
      backtrack = Some((p, t));
      p += 1;
    } else if let Some((star, matched)) = backtrack {
      p = star + 1;
      t = matched + 1;
      backtrack = Some((star, matched + 1));
    } else {
      return false;
    }
  }

  pattern[p..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn extension_patterns() {
    assert!(wildcard_match("*.dll", "small3d.dll"));
    assert!(!wildcard_match("*.dll", "small3d.lib"));
    assert!(wildcard_match("*.a", "libsmall3d.a"));
    assert!(!wildcard_match("*.a", "libsmall3d.a.bak"));
  }

  #[test]
  fn versioned_shared_objects() {
    assert!(wildcard_match("*.so*", "libsmall3d.so"));
    assert!(wildcard_match("*.so*", "libsmall3d.so.1.0.10"));
    assert!(!wildcard_match("*.so*", "libsmall3d.a"));
  }

  #[test]
  fn exact_and_single_character() {
    assert!(wildcard_match("FindSMALL3D.cmake", "FindSMALL3D.cmake"));
    assert!(!wildcard_match("FindSMALL3D.cmake", "FindSMALL3D.cmake.in"));
    assert!(wildcard_match("shader?.glsl", "shader1.glsl"));
    assert!(!wildcard_match("shader?.glsl", "shader.glsl"));
  }

  #[test]
  fn star_crosses_separators() {
    assert!(wildcard_match("small3d/*", "small3d/include/small3d/Model.hpp"));
    assert!(!wildcard_match("cmake/*", "small3d/cmake/x"));
    assert!(wildcard_match("*", ""));
  }
}
