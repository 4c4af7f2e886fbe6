// SPDX-License-Identifier: MIT OR Apache-2.0

use core::ops::Range;

use crate::{classify, decode_codepoint, DirectionClass};

/// An iterator over the paragraphs of UTF-16 text.
///
/// Yields the range of each paragraph without its separator. `\r\n` is one separator, and text
/// ending with a separator has no empty paragraph after it.
#[derive(Clone, Debug)]
pub struct BidiParagraphs<'text> {
    text: &'text [u16],
    position: usize,
}

impl<'text> BidiParagraphs<'text> {
    pub fn new(text: &'text [u16]) -> Self {
        Self { text, position: 0 }
    }
}

/// Length of the paragraph separator at `index`, or 0
fn separator_len(text: &[u16], index: usize) -> usize {
    let unit = text[index];
    // ASCII needs no table lookup
    if unit < 0x80 {
        return match unit {
            0x0D if text.get(index + 1) == Some(&0x0A) => 2,
            0x0A | 0x0D | 0x1C..=0x1E => 1,
            _ => 0,
        };
    }
    let (codepoint, _) = decode_codepoint(text, index);
    usize::from(classify(codepoint) == DirectionClass::ParagraphSeparator)
}

impl<'text> Iterator for BidiParagraphs<'text> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.position;
        if start >= self.text.len() {
            return None;
        }
        let mut i = start;
        while i < self.text.len() {
            let separator = separator_len(self.text, i);
            if separator > 0 {
                self.position = i + separator;
                return Some(start..i);
            }
            i += 1;
        }
        self.position = i;
        Some(start..i)
    }
}
