//! Lexical helpers over GLSL source, used by the headless driver model.

/// Removes `//` and `/* */` comments.
pub fn strip_comments(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, chars.peek()) {
            ('/', Some(&'/')) => {
                while let Some(&n) = chars.peek() {
                    if n == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            ('/', Some(&'*')) => {
                chars.next();
                let mut last = '\0';
                while let Some(n) = chars.next() {
                    if last == '*' && n == '/' {
                        break;
                    }
                    last = n;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    out
}

/// Iterates over the identifiers and keywords of `src`.
pub fn identifiers<'a>(src: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    src.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|v| !v.is_empty())
        .filter(|v| !v.starts_with(|c: char| c.is_ascii_digit()))
}

/// Returns the names of the variables declared with the storage qualifier
/// `storage` (`uniform`, `in` or `out`) in `src`, in declaration order.
pub fn declarations<'a>(src: &'a str, storage: &str) -> Vec<&'a str> {
    const QUALIFIERS: &[&str] = &["lowp", "mediump", "highp", "layout", "location"];

    let mut names = Vec::new();
    let mut iter = identifiers(src);
    while let Some(token) = iter.next() {
        if token != storage {
            continue;
        }

        let mut rest = iter.by_ref().skip_while(|v| QUALIFIERS.contains(v));
        // Skips the type, then takes the name.
        if let (Some(_), Some(name)) = (rest.next(), rest.next()) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }

    names
}

#[inline]
pub fn uniform_declarations(src: &str) -> Vec<&str> {
    declarations(src, "uniform")
}

/// Returns the declared uniforms of `src` that are referenced somewhere besides
/// their declaration. A driver is free to drop every other one.
pub fn active_uniforms(src: &str) -> Vec<&str> {
    uniform_declarations(src)
        .into_iter()
        .filter(|name| identifiers(src).filter(|v| v == name).count() > 1)
        .collect()
}

/// Returns the 1-based line of the first brace that has no counterpart, if any.
pub fn unbalanced_brace(src: &str) -> Option<usize> {
    let mut open = Vec::new();
    for (i, line) in src.lines().enumerate() {
        for c in line.chars() {
            match c {
                '{' => open.push(i + 1),
                '}' => {
                    if open.pop().is_none() {
                        return Some(i + 1);
                    }
                }
                _ => {}
            }
        }
    }

    open.pop()
}

#[cfg(test)]
mod test {
    use super::*;

    const SRC: &str = "#version 330 core
layout (location = 0) in vec3 position;
uniform mat4 transform; // the model matrix
uniform highp vec4 unused;
/* uniform vec4 commented; */
void main() {
    gl_Position = transform * vec4(position, 1.0);
}
";

    #[test]
    fn uniforms() {
        let src = strip_comments(SRC);
        assert_eq!(uniform_declarations(&src), vec!["transform", "unused"]);
        assert_eq!(active_uniforms(&src), vec!["transform"]);
    }

    #[test]
    fn stage_interface() {
        let src = strip_comments(SRC);
        assert_eq!(declarations(&src, "in"), vec!["position"]);
        assert!(declarations(&src, "out").is_empty());

        let src = "in highp vec2 uv;\nflat in int id;\nout vec4 color;";
        assert_eq!(declarations(src, "in"), vec!["uv", "id"]);
        assert_eq!(declarations(src, "out"), vec!["color"]);
    }

    #[test]
    fn comments() {
        let src = strip_comments("a // b\nc /* d\n e */ f");
        assert_eq!(identifiers(&src).collect::<Vec<_>>(), vec!["a", "c", "f"]);
    }

    #[test]
    fn braces() {
        assert_eq!(unbalanced_brace(SRC), None);
        assert_eq!(unbalanced_brace("void main() {\n"), Some(1));
        assert_eq!(unbalanced_brace("}\n"), Some(1));
    }
}
