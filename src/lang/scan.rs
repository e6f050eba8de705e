use super::Location;
use std::collections::VecDeque;
use std::rc::Rc;

/// ## Source word scanner
///
/// Splits input into whitespace-delimited words with line and column
/// positions. A `\` word discards the rest of its line. Words are
/// lowercased on the way out. Imported files are pushed as nested
/// sources and drained before the interactive input continues.

pub struct Token {
    pub text: String,
    pub location: Location,
}

struct Source {
    file: Rc<str>,
    lno: u32,
    tokens: VecDeque<Token>,
}

impl Source {
    fn new(file: &str) -> Source {
        Source {
            file: file.into(),
            lno: 0,
            tokens: VecDeque::new(),
        }
    }

    fn push_line(&mut self, line: &str) {
        self.lno += 1;
        let mut skipping = false;
        for (col, word) in split_words(line) {
            if skipping {
                continue;
            }
            if word == "\\" {
                skipping = true;
                continue;
            }
            self.tokens.push_back(Token {
                text: word.to_lowercase(),
                location: Location {
                    file: self.file.clone(),
                    lno: self.lno,
                    col: col as u32,
                },
            });
        }
    }
}

fn split_words(line: &str) -> Vec<(usize, &str)> {
    let mut words = vec![];
    let mut start: Option<usize> = None;
    for (i, c) in line.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                words.push((s, &line[s..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        words.push((s, &line[s..]));
    }
    words
}

pub struct Scanner {
    base: Source,
    nested: Vec<Source>,
    last: Location,
}

impl Scanner {
    pub fn new() -> Scanner {
        let base = Source::new("<stdin>");
        let last = Location {
            file: base.file.clone(),
            lno: 0,
            col: 0,
        };
        Scanner {
            base,
            nested: vec![],
            last,
        }
    }

    /// Append one line of interactive input.
    pub fn push_line(&mut self, line: &str) {
        self.base.push_line(line);
    }

    /// Push a whole file as a nested source; its words are read before
    /// anything still pending on the outer sources.
    pub fn push_source(&mut self, file: &str, text: &str) {
        let mut source = Source::new(file);
        for line in text.lines() {
            source.push_line(line);
        }
        self.nested.push(source);
    }

    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            match self.nested.last_mut() {
                Some(source) => match source.tokens.pop_front() {
                    Some(token) => {
                        self.last = token.location.clone();
                        return Some(token);
                    }
                    None => {
                        self.nested.pop();
                    }
                },
                None => {
                    let token = self.base.tokens.pop_front()?;
                    self.last = token.location.clone();
                    return Some(token);
                }
            }
        }
    }

    /// Location of the most recently read word.
    pub fn location(&self) -> &Location {
        &self.last
    }

    /// Discard everything not yet read, including nested sources.
    pub fn clear_pending(&mut self) {
        self.nested.clear();
        self.base.tokens.clear();
    }
}
