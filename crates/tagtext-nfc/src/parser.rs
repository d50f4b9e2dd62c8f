pub mod stream;

use stream::{Stream, StreamExt as _};
use winnow::{
    ModalResult, Parser,
    binary::{
        Endianness, be_u8,
        bits::{bits, bool as take_bool, take as take_bits},
    },
    combinator::cut_err,
    error::{ContextError, ErrMode, StrContext, StrContextValue},
    token::{any, take},
};

use crate::{
    NdefError,
    header::NdefHeader,
    ndef_type::NdefType,
    payload::{TextPayload, TextPayloadFormat, expand_uri},
    record::NdefRecord,
};

/// Parse a complete NDEF message, stopping at the record flagged as message end
pub fn parse_message(bytes: &[u8]) -> Result<Vec<NdefRecord>, NdefError> {
    let mut stream = stream::new(bytes);
    parse_ndef_records(&mut stream).map_err(into_ndef_error)
}

/// Decode the payload of a well-known text record
pub fn decode_text_payload(payload: &[u8]) -> Result<TextPayload, NdefError> {
    if payload.is_empty() {
        return Err(NdefError::InvalidTextPayload("empty payload".to_string()));
    }

    let mut stream = stream::new(payload);
    parse_text_payload(&mut stream).map_err(|error| match error {
        ErrMode::Incomplete(_) => {
            NdefError::InvalidTextPayload("language code longer than payload".to_string())
        }
        error => NdefError::InvalidTextPayload(error.to_string()),
    })
}

/// Decode the payload of a well-known URI record, expanding the prefix code
pub fn decode_uri_payload(payload: &[u8]) -> Result<String, NdefError> {
    if payload.is_empty() {
        return Err(NdefError::ParsingError("empty uri payload".to_string()));
    }

    let mut stream = stream::new(payload);
    let (code, rest) = (be_u8, stream::rest)
        .parse_next(&mut stream)
        .map_err(into_ndef_error)?;

    Ok(expand_uri(code, &String::from_utf8_lossy(rest)))
}

/// Chunked records are rejected, they are never reassembled
pub fn parse_ndef_records(input: &mut Stream<'_>) -> ModalResult<Vec<NdefRecord>> {
    let mut records = Vec::new();

    loop {
        let (header, record) = cut_err(
            parse_ndef_record
                .verify(|(header, _): &(NdefHeader, NdefRecord)| !header.chunked)
                .context(StrContext::Label("record"))
                .context(StrContext::Expected(StrContextValue::Description(
                    "chunk flag cleared",
                ))),
        )
        .parse_next(input)?;
        records.push(record);

        if header.message_end {
            break;
        }
    }

    Ok(records)
}

pub fn parse_ndef_record(input: &mut Stream<'_>) -> ModalResult<(NdefHeader, NdefRecord)> {
    let header = parse_header.parse_next(input)?;
    let type_ = parse_type(input, header.type_length)?;
    let id = parse_id(input, header.id_length)?;
    let payload = parse_payload(input, header.payload_length)?;

    let record = NdefRecord {
        type_name_format: header.type_name_format,
        type_,
        id,
        payload,
    };

    Ok((header, record))
}

fn into_ndef_error(error: ErrMode<ContextError>) -> NdefError {
    match error {
        ErrMode::Incomplete(_) => NdefError::NotEnoughData,
        error => NdefError::ParsingError(error.to_string()),
    }
}

// private
fn parse_header_byte(input: &mut Stream<'_>) -> ModalResult<(bool, bool, bool, bool, bool, u8)> {
    bits::<_, _, ErrMode<ContextError>, _, _>((
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bool,
        take_bits(3_u8),
    ))
    .parse_next(input)
}

fn parse_header(input: &mut Stream<'_>) -> ModalResult<NdefHeader> {
    let (message_begin, message_end, chunked, short_record, has_id_length, type_name_format) =
        parse_header_byte(input)?;

    let type_length = winnow::binary::u8.parse_next(input)?;

    let payload_length = if short_record {
        any.map(|x: u8| x as u32).parse_next(input)?
    } else {
        winnow::binary::u32(Endianness::Big).parse_next(input)?
    };

    let id_length = if has_id_length {
        Some(any.parse_next(input)?)
    } else {
        None
    };

    Ok(NdefHeader {
        message_begin,
        message_end,
        chunked,
        short_record,
        has_id_length,
        type_name_format: NdefType::from_bits(type_name_format),
        type_length,
        payload_length,
        id_length,
    })
}

fn parse_type(input: &mut Stream<'_>, type_length: u8) -> ModalResult<Vec<u8>> {
    take(type_length as usize)
        .map(|s: &[u8]| s.to_vec())
        .parse_next(input)
}

fn parse_id(input: &mut Stream<'_>, id_length: Option<u8>) -> ModalResult<Option<Vec<u8>>> {
    if let Some(id_len) = id_length {
        take(id_len as usize)
            .map(|s: &[u8]| Some(s.to_vec()))
            .parse_next(input)
    } else {
        Ok(None)
    }
}

fn parse_payload(input: &mut Stream<'_>, payload_length: u32) -> ModalResult<Vec<u8>> {
    take(payload_length as usize)
        .map(|s: &[u8]| s.to_vec())
        .parse_next(input)
}

fn parse_text_payload(input: &mut Stream<'_>) -> ModalResult<TextPayload> {
    // status byte: utf-16 flag, reserved bit, 6 bit language code length
    let (is_utf16, _reserved, language_code_length): (bool, bool, u8) =
        bits::<_, _, ErrMode<ContextError>, _, _>((take_bool, take_bool, take_bits(6_u8)))
            .parse_next(input)?;

    let language_code = take(language_code_length as usize).parse_next(input)?;
    let text = stream::rest(input)?;

    let (format, text) = if is_utf16 {
        (TextPayloadFormat::Utf16, decode_utf16(text))
    } else {
        (TextPayloadFormat::Utf8, String::from_utf8_lossy(text).to_string())
    };

    debug_assert!(input.is_empty());

    Ok(TextPayload {
        format,
        language: String::from_utf8_lossy(language_code).to_string(),
        text,
    })
}

/// UTF-16 text is big endian unless a byte order mark says otherwise
fn decode_utf16(bytes: &[u8]) -> String {
    let (little_endian, bytes) = match bytes {
        [0xFF, 0xFE, rest @ ..] => (true, rest),
        [0xFE, 0xFF, rest @ ..] => (false, rest),
        _ => (false, bytes),
    };

    let units = bytes
        .chunks_exact(2)
        .map(|chunk| {
            if little_endian {
                u16::from_le_bytes([chunk[0], chunk[1]])
            } else {
                u16::from_be_bytes([chunk[0], chunk[1]])
            }
        })
        .collect::<Vec<u16>>();

    let mut text = String::from_utf16_lossy(&units);
    if !bytes.chunks_exact(2).remainder().is_empty() {
        text.push(char::REPLACEMENT_CHARACTER);
    }

    text
}
