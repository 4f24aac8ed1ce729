use std::fmt;

/// Dominant line-ending style of a text file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// No line breaks at all, the file is a single line
    None,
    Lf,
    Cr,
    CrLf,
}

impl LineEnding {
    /// Classify the line-ending style of `content`.
    ///
    /// CR and LF are counted including the halves of every CRLF pair, so a
    /// file mixing styles is classified heuristically:
    /// - no CR and no LF: [`LineEnding::None`]
    /// - CRLF count equals both the CR and the LF count: [`LineEnding::CrLf`]
    /// - more CR than LF: [`LineEnding::Cr`]
    /// - anything else: [`LineEnding::Lf`]
    pub fn detect(content: &str) -> Self {
        let cr = content.matches('\r').count();
        let lf = content.matches('\n').count();
        let crlf = content.matches("\r\n").count();

        if cr == 0 && lf == 0 {
            LineEnding::None
        } else if crlf == cr && crlf == lf {
            LineEnding::CrLf
        } else if cr > lf {
            LineEnding::Cr
        } else {
            LineEnding::Lf
        }
    }

    /// The separator token used to split and rejoin lines
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::None => "",
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
            LineEnding::CrLf => "\r\n",
        }
    }

    /// Split `content` into lines. Joining the result with [`Self::join`]
    /// gives back `content` unchanged.
    pub fn split<'a>(&self, content: &'a str) -> Vec<&'a str> {
        match self {
            LineEnding::None => vec![content],
            _ => content.split(self.as_str()).collect(),
        }
    }

    /// Join lines with this separator
    pub fn join<S: AsRef<str>>(&self, lines: &[S]) -> String {
        let mut out = String::new();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                out.push_str(self.as_str());
            }
            out.push_str(line.as_ref());
        }
        out
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineEnding::None => "none",
            LineEnding::Lf => "LF",
            LineEnding::Cr => "CR",
            LineEnding::CrLf => "CRLF",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_single_line() {
        assert_eq!(LineEnding::detect("1.2.3"), LineEnding::None);
        assert_eq!(LineEnding::detect(""), LineEnding::None);
    }

    #[test]
    fn test_detect_lf() {
        assert_eq!(LineEnding::detect("a\nb\n"), LineEnding::Lf);
    }

    #[test]
    fn test_detect_crlf() {
        assert_eq!(LineEnding::detect("a\r\nb\r\n"), LineEnding::CrLf);
    }

    #[test]
    fn test_detect_cr() {
        assert_eq!(LineEnding::detect("a\rb\rc"), LineEnding::Cr);
    }

    #[test]
    fn test_detect_mixed_crlf_and_lf_falls_back_to_lf() {
        // cr = 1, lf = 2, crlf = 1
        assert_eq!(LineEnding::detect("a\r\nb\nc"), LineEnding::Lf);
    }

    #[test]
    fn test_detect_mixed_crlf_and_cr_is_cr() {
        // cr = 2, lf = 1, crlf = 1
        assert_eq!(LineEnding::detect("a\r\nb\rc"), LineEnding::Cr);
    }

    #[test]
    fn test_detect_equal_lone_cr_and_lf_is_lf() {
        // cr = 1, lf = 1, crlf = 0
        assert_eq!(LineEnding::detect("a\rb\nc"), LineEnding::Lf);
    }

    #[test]
    fn test_split_join_is_lossless() {
        let samples = [
            "one line",
            "a\nb\n",
            "a\r\nb\r\n\r\n",
            "a\rb",
            "a\r\nb\nc\rd",
            "\n",
        ];
        for sample in samples {
            let ending = LineEnding::detect(sample);
            let lines = ending.split(sample);
            assert_eq!(ending.join(&lines), sample, "ending {}", ending);
        }
    }

    #[test]
    fn test_split_trailing_newline_yields_empty_last_line() {
        let lines = LineEnding::Lf.split("a\nb\n");
        assert_eq!(lines, vec!["a", "b", ""]);
    }

    #[test]
    fn test_as_str() {
        assert_eq!(LineEnding::None.as_str(), "");
        assert_eq!(LineEnding::CrLf.as_str(), "\r\n");
    }
}
