//! Translation of request date/time patterns (`dd MMMM yyyy`, `HH:mm`) into
//! chrono format strings.

/// ## Summary
/// Converts a `yyyy-MM-dd` style date/time pattern into a chrono format string.
///
/// Letter runs map to chrono specifiers (`yyyy` → `%Y`, `MMMM` → `%B`,
/// `dd` → `%d`, `HH` → `%H`, `mm` → `%M`, ...). Text inside single quotes is
/// copied literally and `''` is an escaped quote.
///
/// ## Errors
/// Returns the offending letter run if the pattern uses a field that has no
/// chrono equivalent.
pub fn to_chrono_format(pattern: &str) -> Result<String, String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            while i < chars.len() && chars[i] != '\'' {
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            i += 1;
            continue;
        }

        let run = chars[i..].iter().take_while(|&&x| x == c).count();
        let spec = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1 | 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', _) => "%d",
            ('H', _) => "%H",
            ('h', _) => "%I",
            ('m', _) => "%M",
            ('s', _) => "%S",
            ('a', _) => "%p",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            _ => return Err(chars[i..i + run].iter().collect()),
        };
        out.push_str(spec);
        i += run;
    }

    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}
