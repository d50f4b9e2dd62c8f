//! NDEF message TLV framing, as stored in the memory of Type 2 tags

use winnow::{
    ModalResult, Parser as _,
    binary::{be_u16, u8 as byte},
    error::{ContextError, ErrMode},
    token::take,
};

use crate::{
    NdefError,
    parser::stream::{self, Stream, StreamExt as _},
};

pub const NULL_TAG: u8 = 0x00;
pub const NDEF_MESSAGE_TAG: u8 = 0x03;
pub const TERMINATOR_TAG: u8 = 0xFE;

const THREE_BYTE_LENGTH_MARKER: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tlv<'i> {
    Null,
    NdefMessage(&'i [u8]),
    Terminator,
    Other,
}

/// Wrap an encoded NDEF message in an NDEF message TLV followed by a terminator TLV
pub fn wrap_message(message: &[u8]) -> Result<Vec<u8>, NdefError> {
    if message.len() > u16::MAX as usize {
        return Err(NdefError::FieldTooLong {
            field: "tlv value".to_string(),
            max: u16::MAX as u64,
            actual: message.len() as u64,
        });
    }

    let mut bytes = Vec::with_capacity(message.len() + 5);
    bytes.push(NDEF_MESSAGE_TAG);

    if message.len() < THREE_BYTE_LENGTH_MARKER as usize {
        bytes.push(message.len() as u8);
    } else {
        bytes.push(THREE_BYTE_LENGTH_MARKER);
        bytes.extend_from_slice(&(message.len() as u16).to_be_bytes());
    }

    bytes.extend_from_slice(message);
    bytes.push(TERMINATOR_TAG);

    Ok(bytes)
}

/// Find the first NDEF message TLV in tag memory
///
/// Returns `None` if a terminator, or the end of memory, is reached first
pub fn find_message(memory: &[u8]) -> Result<Option<Vec<u8>>, NdefError> {
    let mut input = stream::new(memory);

    while !input.is_empty() {
        match parse_tlv(&mut input).map_err(into_ndef_error)? {
            Tlv::NdefMessage(message) => return Ok(Some(message.to_vec())),
            Tlv::Terminator => return Ok(None),
            Tlv::Null | Tlv::Other => {}
        }
    }

    Ok(None)
}

fn into_ndef_error(error: ErrMode<ContextError>) -> NdefError {
    match error {
        ErrMode::Incomplete(_) => NdefError::NotEnoughData,
        error => NdefError::ParsingError(error.to_string()),
    }
}

fn parse_tlv<'i>(input: &mut Stream<'i>) -> ModalResult<Tlv<'i>> {
    let tag = byte.parse_next(input)?;

    match tag {
        NULL_TAG => Ok(Tlv::Null),
        TERMINATOR_TAG => Ok(Tlv::Terminator),
        tag => {
            let length = parse_length(input)?;
            let value = take(length).parse_next(input)?;

            if tag == NDEF_MESSAGE_TAG {
                Ok(Tlv::NdefMessage(value))
            } else {
                Ok(Tlv::Other)
            }
        }
    }
}

fn parse_length(input: &mut Stream<'_>) -> ModalResult<usize> {
    let length = byte.parse_next(input)?;
    if length != THREE_BYTE_LENGTH_MARKER {
        return Ok(length as usize);
    }

    let length = be_u16.parse_next(input)?;
    Ok(length as usize)
}
