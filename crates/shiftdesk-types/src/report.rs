//! Report payloads, one struct per report kind.
//!
//! Reports carrying photos are generic over an [`AttachmentRepr`]: the same
//! struct describes the live form state (`Live`, holding [`Attachment`]s) and
//! the at-rest draft payload (`Stored`, holding text placeholders). Moving
//! between the two is the codec's job and happens per variant, so every
//! attachment field is known statically.
//!
//! Field names are persisted in camelCase to stay readable by the web client.

use std::fmt::Debug;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::attachment::{Attachment, AttachmentEntry, AttachmentRef, MAX_RECEIVING_PHOTOS};
use crate::draft::ReportKind;

/// Number of income rows on a blank shift report.
pub const SHIFT_INCOME_ROWS: usize = 2;
/// Number of expense rows on a blank shift report.
pub const SHIFT_EXPENSE_ROWS: usize = 10;
/// Number of kitchen rows on a blank goods-receiving log.
pub const RECEIVING_KITCHEN_ROWS: usize = 15;
/// Number of bar rows on a blank goods-receiving log.
pub const RECEIVING_BAR_ROWS: usize = 10;
/// Number of packaging rows on a blank goods-receiving log.
pub const RECEIVING_PACKAGING_ROWS: usize = 5;
/// Number of rows per table on write-off and transfer acts.
pub const MOVEMENT_ROWS: usize = 4;

/// How attachment fields are represented inside a report.
pub trait AttachmentRepr: Debug + Clone + PartialEq + Default + Send + Sync + 'static {
    /// Representation of a single-attachment field.
    type Single: Debug + Clone + PartialEq + Send + Sync + 'static;
    /// Representation of one item in a multi-attachment field.
    type Multi: Debug + Clone + PartialEq + Send + Sync + 'static;
}

/// Attachments as live binary objects (form state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Live;

impl AttachmentRepr for Live {
    type Single = Attachment;
    type Multi = Attachment;
}

/// Attachments as text placeholders (draft payload at rest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stored;

impl AttachmentRepr for Stored {
    type Single = AttachmentRef;
    type Multi = AttachmentEntry;
}

// ---------------------------------------------------------------------------
// Line items
// ---------------------------------------------------------------------------

/// Extra cash income recorded during a shift.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomeLine {
    pub amount: String,
    pub comment: String,
}

impl IncomeLine {
    pub fn is_filled(&self) -> bool {
        !self.amount.is_empty() || !self.comment.is_empty()
    }
}

/// Cash paid out during a shift.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpenseLine {
    pub name: String,
    pub amount: String,
}

impl ExpenseLine {
    pub fn is_filled(&self) -> bool {
        !self.name.is_empty() || !self.amount.is_empty()
    }
}

/// Totals copied from the point-of-sale system at shift close.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IikoData {
    pub total_revenue: String,
    pub returns: String,
    pub acquiring: String,
    pub qr_code: String,
    pub online_app: String,
    pub yandex_eda: String,
    pub yandex_eda_no_system: String,
    pub primehill: String,
}

impl IikoData {
    pub fn is_filled(&self) -> bool {
        [
            &self.total_revenue,
            &self.returns,
            &self.acquiring,
            &self.qr_code,
            &self.online_app,
            &self.yandex_eda,
            &self.yandex_eda_no_system,
            &self.primehill,
        ]
        .iter()
        .any(|v| !v.is_empty())
    }
}

/// One received item on a goods-receiving log.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoodsLine {
    pub name: String,
    pub quantity: String,
    pub unit: String,
}

impl GoodsLine {
    pub fn is_filled(&self) -> bool {
        !self.name.is_empty() || !self.quantity.is_empty() || !self.unit.is_empty()
    }
}

/// One written-off or transferred item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MovementLine {
    pub name: String,
    pub weight: String,
    pub unit: String,
    pub reason: String,
}

impl MovementLine {
    pub fn is_filled(&self) -> bool {
        !self.name.is_empty()
            || !self.weight.is_empty()
            || !self.unit.is_empty()
            || !self.reason.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// Shift closing and cash reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    default,
    bound(
        serialize = "R::Single: Serialize",
        deserialize = "R::Single: Deserialize<'de>"
    )
)]
pub struct ShiftReport<R: AttachmentRepr = Live> {
    pub location: String,
    pub shift: String,
    pub date: String,
    pub cashier_name: String,
    pub incomes: Vec<IncomeLine>,
    pub expenses: Vec<ExpenseLine>,
    pub iiko_data: IikoData,
    pub fact_cash: String,
    /// Photo of the cash register report.
    pub photo: Option<R::Single>,
    pub comments: String,
}

impl<R: AttachmentRepr> Default for ShiftReport<R> {
    fn default() -> Self {
        Self {
            location: String::new(),
            shift: String::new(),
            date: String::new(),
            cashier_name: String::new(),
            incomes: vec![IncomeLine::default(); SHIFT_INCOME_ROWS],
            expenses: vec![ExpenseLine::default(); SHIFT_EXPENSE_ROWS],
            iiko_data: IikoData::default(),
            fact_cash: String::new(),
            photo: None,
            comments: String::new(),
        }
    }
}

impl<R: AttachmentRepr> ShiftReport<R> {
    pub fn has_content(&self) -> bool {
        !self.location.is_empty()
            || !self.shift.is_empty()
            || !self.cashier_name.is_empty()
            || self.incomes.iter().any(IncomeLine::is_filled)
            || self.expenses.iter().any(ExpenseLine::is_filled)
            || self.iiko_data.is_filled()
            || !self.fact_cash.is_empty()
            || self.photo.is_some()
            || !self.comments.is_empty()
    }
}

/// Daily inventory count.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryCount {
    pub location: String,
    pub shift: String,
    pub date: String,
    pub conductor: String,
    /// Item name to counted quantity, in the order the form lists them.
    pub items: IndexMap<String, String>,
}

impl InventoryCount {
    pub fn has_content(&self) -> bool {
        !self.location.is_empty()
            || !self.shift.is_empty()
            || !self.conductor.is_empty()
            || self.items.values().any(|v| !v.is_empty())
    }
}

/// Goods-receiving log with invoice photos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    default,
    bound(
        serialize = "R::Multi: Serialize",
        deserialize = "R::Multi: Deserialize<'de>"
    )
)]
pub struct ReceivingLog<R: AttachmentRepr = Live> {
    pub location: String,
    pub date: String,
    /// Invoice photos, at most [`MAX_RECEIVING_PHOTOS`].
    pub photos: Vec<R::Multi>,
    pub kitchen: Vec<GoodsLine>,
    pub bar: Vec<GoodsLine>,
    pub packaging: Vec<GoodsLine>,
}

impl<R: AttachmentRepr> Default for ReceivingLog<R> {
    fn default() -> Self {
        Self {
            location: String::new(),
            date: String::new(),
            photos: Vec::new(),
            kitchen: vec![GoodsLine::default(); RECEIVING_KITCHEN_ROWS],
            bar: vec![GoodsLine::default(); RECEIVING_BAR_ROWS],
            packaging: vec![GoodsLine::default(); RECEIVING_PACKAGING_ROWS],
        }
    }
}

impl<R: AttachmentRepr> ReceivingLog<R> {
    pub fn has_content(&self) -> bool {
        !self.location.is_empty()
            || !self.photos.is_empty()
            || self.kitchen.iter().any(GoodsLine::is_filled)
            || self.bar.iter().any(GoodsLine::is_filled)
            || self.packaging.iter().any(GoodsLine::is_filled)
    }
}

/// Outcome of adding photos to a receiving log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoIntake {
    /// Photos appended to the log.
    pub added: usize,
    /// Photos refused because of type or size.
    pub rejected: usize,
}

impl ReceivingLog<Live> {
    /// Append photos, skipping files that are not acceptable images and
    /// keeping at most [`MAX_RECEIVING_PHOTOS`] in total.
    pub fn add_photos(&mut self, photos: impl IntoIterator<Item = Attachment>) -> PhotoIntake {
        let before = self.photos.len();
        let mut rejected = 0;

        for photo in photos {
            if !photo.is_accepted_photo() {
                rejected += 1;
                continue;
            }
            if self.photos.len() < MAX_RECEIVING_PHOTOS {
                self.photos.push(photo);
            }
        }

        PhotoIntake {
            added: self.photos.len() - before,
            rejected,
        }
    }
}

/// Write-off act, with an optional transfer table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WriteoffAct {
    pub location: String,
    pub date: String,
    pub write_offs: Vec<MovementLine>,
    pub transfers: Vec<MovementLine>,
}

impl Default for WriteoffAct {
    fn default() -> Self {
        Self {
            location: String::new(),
            date: String::new(),
            write_offs: vec![MovementLine::default(); MOVEMENT_ROWS],
            transfers: vec![MovementLine::default(); MOVEMENT_ROWS],
        }
    }
}

impl WriteoffAct {
    pub fn has_content(&self) -> bool {
        !self.location.is_empty()
            || self.write_offs.iter().any(MovementLine::is_filled)
            || self.transfers.iter().any(MovementLine::is_filled)
    }
}

/// Standalone transfer act between locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransferAct {
    pub location: String,
    pub shift: String,
    pub cashier_name: String,
    pub date: String,
    pub transfers: Vec<MovementLine>,
}

impl Default for TransferAct {
    fn default() -> Self {
        Self {
            location: String::new(),
            shift: String::new(),
            cashier_name: String::new(),
            date: String::new(),
            transfers: vec![MovementLine::default(); MOVEMENT_ROWS],
        }
    }
}

impl TransferAct {
    // Shift and cashier name alone do not make a transfer worth keeping.
    pub fn has_content(&self) -> bool {
        !self.location.is_empty() || self.transfers.iter().any(MovementLine::is_filled)
    }
}

/// A report of any kind: the closed union of payload shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum Report<R: AttachmentRepr = Live> {
    Shift(ShiftReport<R>),
    Inventory(InventoryCount),
    Receiving(ReceivingLog<R>),
    Writeoff(WriteoffAct),
    Transfer(TransferAct),
}

/// In-progress form state, holding live attachments.
pub type FormState = Report<Live>;

/// Draft payload as persisted, holding attachment placeholders.
pub type DraftPayload = Report<Stored>;

impl<R: AttachmentRepr> Report<R> {
    /// A blank report of the given kind, with the usual number of empty rows.
    pub fn blank(kind: ReportKind) -> Self {
        match kind {
            ReportKind::Shift => Report::Shift(ShiftReport::default()),
            ReportKind::Inventory => Report::Inventory(InventoryCount::default()),
            ReportKind::Receiving => Report::Receiving(ReceivingLog::default()),
            ReportKind::Writeoff => Report::Writeoff(WriteoffAct::default()),
            ReportKind::Transfer => Report::Transfer(TransferAct::default()),
        }
    }

    pub fn kind(&self) -> ReportKind {
        match self {
            Report::Shift(_) => ReportKind::Shift,
            Report::Inventory(_) => ReportKind::Inventory,
            Report::Receiving(_) => ReportKind::Receiving,
            Report::Writeoff(_) => ReportKind::Writeoff,
            Report::Transfer(_) => ReportKind::Transfer,
        }
    }

    /// Whether the user has entered anything worth autosaving.
    pub fn has_content(&self) -> bool {
        match self {
            Report::Shift(r) => r.has_content(),
            Report::Inventory(r) => r.has_content(),
            Report::Receiving(r) => r.has_content(),
            Report::Writeoff(r) => r.has_content(),
            Report::Transfer(r) => r.has_content(),
        }
    }

    pub fn location(&self) -> &str {
        match self {
            Report::Shift(r) => &r.location,
            Report::Inventory(r) => &r.location,
            Report::Receiving(r) => &r.location,
            Report::Writeoff(r) => &r.location,
            Report::Transfer(r) => &r.location,
        }
    }
}
