use crate::model::{NewOffer, Offer};
use crate::query::{select_params, Filters};
use crate::store::{StoreClient, StoreError};
use crate::summary::{self, Totals};

/// Handle for one issued read. A response is applied only while its ticket
/// is still the latest issued; anything older is discarded as stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadTicket {
    seq: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// One interactive session over the offers table: the current filter
/// snapshot, the transient cached result set, the last read error, and the
/// read sequence counter. The store keeps the authoritative copy; this is
/// a fully-replaceable cache of the latest query result.
#[derive(Clone, Debug)]
pub struct Session {
    client: StoreClient,
    filters: Filters,
    offers: Vec<Offer>,
    read_error: Option<String>,
    issued_seq: u64,
}

impl Session {
    pub fn new(client: StoreClient) -> Self {
        Self {
            client,
            filters: Filters::default(),
            offers: Vec::new(),
            read_error: None,
            issued_seq: 0,
        }
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn read_error(&self) -> Option<&str> {
        self.read_error.as_deref()
    }

    pub fn totals(&self) -> Totals {
        summary::totals(&self.offers)
    }

    pub fn begin_read(&mut self) -> ReadTicket {
        self.issued_seq += 1;
        ReadTicket {
            seq: self.issued_seq,
        }
    }

    /// Apply one read outcome. Success replaces the result set; failure
    /// discards it and records the message (never preserved stale). Returns
    /// false when the ticket was superseded by a newer read.
    pub fn apply_read(&mut self, ticket: ReadTicket, result: Result<Vec<Offer>, StoreError>) -> bool {
        if ticket.seq != self.issued_seq {
            return false;
        }
        match result {
            Ok(rows) => {
                self.offers = rows;
                self.read_error = None;
            }
            Err(e) => {
                self.offers.clear();
                self.read_error = Some(e.to_string());
            }
        }
        true
    }

    /// Issue exactly one read for the current filter snapshot.
    pub async fn refresh(&mut self) {
        let ticket = self.begin_read();
        let params = select_params(&self.filters);
        let result = self.client.select(&params).await;
        self.apply_read(ticket, result);
    }

    /// Replace the filter snapshot and re-read. One remote read per
    /// filter-state change.
    pub async fn apply_filters(&mut self, filters: Filters) {
        self.filters = filters;
        self.refresh().await;
    }

    pub async fn clear_filters(&mut self) {
        self.apply_filters(Filters::default()).await;
    }

    /// Insert a validated row. On success the caller's form is expected to
    /// reset and the result set is re-read; on failure local state is left
    /// untouched and the error propagates for display.
    pub async fn create(&mut self, offer: &NewOffer) -> Result<(), StoreError> {
        self.client.insert(offer).await?;
        self.refresh().await;
        Ok(())
    }

    /// Delete by identifier. An unconfirmed delete issues no remote call
    /// and leaves the result set unchanged.
    pub async fn delete(&mut self, id: i64, confirmed: bool) -> Result<DeleteOutcome, StoreError> {
        if !confirmed {
            return Ok(DeleteOutcome::Cancelled);
        }
        self.client.delete(id).await?;
        self.refresh().await;
        Ok(DeleteOutcome::Deleted)
    }
}
