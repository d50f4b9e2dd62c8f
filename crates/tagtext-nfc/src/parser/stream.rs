use winnow::{Bytes, ModalResult, Parser as _, Partial, stream::Stream as _, token::take};

pub type Stream<'i> = Partial<&'i Bytes>;

pub fn new(b: &[u8]) -> Stream<'_> {
    Partial::new(Bytes::new(b))
}

pub trait StreamExt {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StreamExt for Stream<'_> {
    fn len(&self) -> usize {
        self.as_ref().len()
    }
}

/// Take every byte still left in the stream
pub fn rest<'i>(input: &mut Stream<'i>) -> ModalResult<&'i [u8]> {
    let remaining = input.eof_offset();
    take(remaining).parse_next(input)
}
