//! Moving report payloads between live form state and stored drafts.
//!
//! Only the shift report photo and the receiving log photos carry binary
//! data; every other field is copied as-is. Attachment failures never fail
//! the whole payload: an attachment that cannot be read or decoded is left
//! out and the rest of the report goes through.

use shiftdesk_types::attachment::{Attachment, AttachmentEntry, AttachmentRef, EncodedFile};
use shiftdesk_types::report::{
    DraftPayload, FormState, Live, ReceivingLog, Report, ShiftReport, Stored,
};

use crate::codec;

/// Encode every attachment in `state` into its text placeholder.
pub async fn encode_payload(state: &FormState) -> DraftPayload {
    match state {
        Report::Shift(shift) => Report::Shift(encode_shift(shift).await),
        Report::Receiving(log) => Report::Receiving(encode_receiving(log).await),
        Report::Inventory(count) => Report::Inventory(count.clone()),
        Report::Writeoff(act) => Report::Writeoff(act.clone()),
        Report::Transfer(act) => Report::Transfer(act.clone()),
    }
}

/// Rebuild live attachments from the placeholders in `payload`.
pub fn decode_payload(payload: DraftPayload) -> FormState {
    match payload {
        Report::Shift(shift) => Report::Shift(decode_shift(shift)),
        Report::Receiving(log) => Report::Receiving(decode_receiving(log)),
        Report::Inventory(count) => Report::Inventory(count),
        Report::Writeoff(act) => Report::Writeoff(act),
        Report::Transfer(act) => Report::Transfer(act),
    }
}

async fn encode_one(attachment: &Attachment) -> Option<EncodedFile> {
    match codec::encode(attachment).await {
        Ok(encoded) => Some(encoded),
        Err(e) => {
            tracing::warn!(name = %attachment.name, error = %e, "dropping attachment that could not be encoded");
            None
        }
    }
}

async fn encode_shift(shift: &ShiftReport<Live>) -> ShiftReport<Stored> {
    let photo = match &shift.photo {
        Some(photo) => encode_one(photo).await.map(|e| e.into_ref()),
        None => None,
    };

    ShiftReport {
        location: shift.location.clone(),
        shift: shift.shift.clone(),
        date: shift.date.clone(),
        cashier_name: shift.cashier_name.clone(),
        incomes: shift.incomes.clone(),
        expenses: shift.expenses.clone(),
        iiko_data: shift.iiko_data.clone(),
        fact_cash: shift.fact_cash.clone(),
        photo,
        comments: shift.comments.clone(),
    }
}

async fn encode_receiving(log: &ReceivingLog<Live>) -> ReceivingLog<Stored> {
    let mut photos = Vec::with_capacity(log.photos.len());
    for photo in &log.photos {
        if let Some(encoded) = encode_one(photo).await {
            photos.push(encoded.into_entry());
        }
    }

    ReceivingLog {
        location: log.location.clone(),
        date: log.date.clone(),
        photos,
        kitchen: log.kitchen.clone(),
        bar: log.bar.clone(),
        packaging: log.packaging.clone(),
    }
}

fn decode_ref(placeholder: &AttachmentRef) -> Option<Attachment> {
    decode_logged(&placeholder.encoded_data, &placeholder.original_name)
}

fn decode_entry(entry: &AttachmentEntry) -> Option<Attachment> {
    decode_logged(&entry.encoded_data, &entry.original_name)
}

fn decode_logged(encoded_data: &str, name: &str) -> Option<Attachment> {
    match codec::decode(encoded_data, name) {
        Ok(attachment) => Some(attachment),
        Err(e) => {
            tracing::warn!(name, error = %e, "dropping attachment that could not be decoded");
            None
        }
    }
}

fn decode_shift(shift: ShiftReport<Stored>) -> ShiftReport<Live> {
    ShiftReport {
        photo: shift.photo.as_ref().and_then(decode_ref),
        location: shift.location,
        shift: shift.shift,
        date: shift.date,
        cashier_name: shift.cashier_name,
        incomes: shift.incomes,
        expenses: shift.expenses,
        iiko_data: shift.iiko_data,
        fact_cash: shift.fact_cash,
        comments: shift.comments,
    }
}

fn decode_receiving(log: ReceivingLog<Stored>) -> ReceivingLog<Live> {
    ReceivingLog {
        photos: log.photos.iter().filter_map(decode_entry).collect(),
        location: log.location,
        date: log.date,
        kitchen: log.kitchen,
        bar: log.bar,
        packaging: log.packaging,
    }
}
