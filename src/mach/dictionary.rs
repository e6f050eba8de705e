use super::Word;
use crate::lang::Error;
use std::collections::HashMap;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Word registry
///
/// Maps names to words. The registry is shared between routines and
/// passed around explicitly; a missing name is a normal lookup result,
/// not an error. Creating a word under an existing name replaces the
/// old record, so no two live words share a name here.

#[derive(Default)]
pub struct Dictionary {
    words: HashMap<Rc<str>, Rc<Word>>,
}

impl Dictionary {
    pub fn new() -> Dictionary {
        Dictionary::default()
    }

    pub fn find(&self, name: &str) -> Option<Rc<Word>> {
        self.words.get(name).cloned()
    }

    pub fn create(&mut self, name: &str, addr: usize, immediate: bool) -> Result<Rc<Word>> {
        let word = Rc::new(Word::new(name, addr, immediate)?);
        self.words.insert(word.name_rc(), word.clone());
        Ok(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Word names in sorted order, for the `words` listing.
    pub fn names(&self) -> Vec<Rc<str>> {
        let mut names: Vec<Rc<str>> = self.words.keys().cloned().collect();
        names.sort();
        names
    }
}
