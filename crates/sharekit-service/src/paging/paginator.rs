//! Page-by-page collection with an optional acceptance filter.
//!
//! A [`PageWalk`] asks its fetcher for `desired - collected` items at a
//! time, advancing the offset by the amount requested. It stops as soon as
//! enough items were accepted ([`WalkState::Done`]) or a page comes back
//! shorter than requested ([`WalkState::Exhausted`]). At most `desired`
//! items are ever held, whatever the size of the listing.

use std::future::Future;
use std::mem;

use sharekit_core::result::AppResult;

/// An item together with the index of the page it arrived on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paged<T> {
    /// Zero-based index of the fetch that produced the item.
    pub page: usize,
    /// The item itself.
    pub item: T,
}

/// Where a walk currently is.
#[derive(Debug, PartialEq, Eq)]
pub enum WalkState<T> {
    /// The next step requests another page.
    Fetching,
    /// The next step filters this freshly fetched page.
    Filtering(Vec<T>),
    /// Enough items were accepted.
    Done,
    /// The listing ran out first.
    Exhausted,
}

impl<T> WalkState<T> {
    /// Whether the walk will not fetch again.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Done | Self::Exhausted)
    }
}

/// Result of a finished walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected<T> {
    /// Accepted items in listing order.
    pub items: Vec<Paged<T>>,
    /// Number of fetches issued.
    pub fetches: usize,
    /// Offset the next page would start at.
    pub next_offset: usize,
    /// Whether the listing ran out before `desired` was reached.
    pub exhausted: bool,
}

impl<T> Collected<T> {
    /// Drop the page indexes.
    pub fn into_items(self) -> Vec<T> {
        self.items.into_iter().map(|paged| paged.item).collect()
    }
}

/// Explicit FETCHING → FILTERING → DONE/EXHAUSTED state machine.
pub struct PageWalk<T, F> {
    fetch: F,
    desired: usize,
    offset: usize,
    requested: usize,
    fetches: usize,
    collected: Vec<Paged<T>>,
    state: WalkState<T>,
}

impl<T, F, Fut> PageWalk<T, F>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = AppResult<Vec<T>>>,
{
    /// Walk a listing from offset zero.
    pub fn new(fetch: F, desired: usize) -> Self {
        Self::starting_at(fetch, 0, desired)
    }

    /// Walk a listing from `offset`.
    pub fn starting_at(fetch: F, offset: usize, desired: usize) -> Self {
        Self {
            fetch,
            desired,
            offset,
            requested: 0,
            fetches: 0,
            collected: Vec::new(),
            state: if desired == 0 {
                WalkState::Done
            } else {
                WalkState::Fetching
            },
        }
    }

    /// Current state.
    pub fn state(&self) -> &WalkState<T> {
        &self.state
    }

    /// Number of items accepted so far.
    pub fn accepted(&self) -> usize {
        self.collected.len()
    }

    /// Advance by one transition. Finished walks stay where they are.
    pub async fn step<P>(&mut self, accept: &mut P) -> AppResult<()>
    where
        P: FnMut(&T) -> bool,
    {
        match mem::replace(&mut self.state, WalkState::Fetching) {
            WalkState::Fetching => {
                let remaining = self.desired - self.collected.len();
                let page = (self.fetch)(remaining, self.offset).await?;
                self.fetches += 1;
                self.requested = remaining;
                self.offset += remaining;
                self.state = WalkState::Filtering(page);
            }
            WalkState::Filtering(page) => {
                let short = page.len() < self.requested;
                let index = self.fetches - 1;
                for item in page {
                    // A source may over-deliver; never hold more than desired.
                    if self.collected.len() >= self.desired {
                        break;
                    }
                    if accept(&item) {
                        self.collected.push(Paged { page: index, item });
                    }
                }
                self.state = if self.collected.len() >= self.desired {
                    WalkState::Done
                } else if short {
                    WalkState::Exhausted
                } else {
                    WalkState::Fetching
                };
            }
            finished => self.state = finished,
        }
        Ok(())
    }

    /// Run to completion, keeping the items `accept` approves.
    pub async fn run<P>(mut self, mut accept: P) -> AppResult<Collected<T>>
    where
        P: FnMut(&T) -> bool,
    {
        while !self.state.is_finished() {
            self.step(&mut accept).await?;
        }
        Ok(Collected {
            exhausted: matches!(self.state, WalkState::Exhausted),
            items: self.collected,
            fetches: self.fetches,
            next_offset: self.offset,
        })
    }
}

/// Collect up to `desired` items starting at offset zero.
pub async fn collect<T, F, Fut>(fetch: F, desired: usize) -> AppResult<Collected<T>>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = AppResult<Vec<T>>>,
{
    PageWalk::new(fetch, desired).run(|_: &T| true).await
}

/// Collect up to `desired` items starting at `offset`.
pub async fn collect_from<T, F, Fut>(fetch: F, offset: usize, desired: usize) -> AppResult<Collected<T>>
where
    F: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = AppResult<Vec<T>>>,
{
    PageWalk::starting_at(fetch, offset, desired)
        .run(|_: &T| true)
        .await
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use futures::future::{Ready, ready};
    use sharekit_core::error::AppError;

    use super::*;

    /// A listing of `0..len` that logs every `(limit, offset)` request.
    fn listing(
        len: usize,
        log: &RefCell<Vec<(usize, usize)>>,
    ) -> impl FnMut(usize, usize) -> Ready<AppResult<Vec<usize>>> + '_ {
        move |limit, offset| {
            log.borrow_mut().push((limit, offset));
            let end = (offset + limit).min(len);
            ready(Ok((offset.min(len)..end).collect()))
        }
    }

    #[tokio::test]
    async fn test_zero_desired_never_fetches() {
        let log = RefCell::new(Vec::new());
        let collected = collect(listing(10, &log), 0).await.unwrap();
        assert!(collected.items.is_empty());
        assert_eq!(collected.fetches, 0);
        assert!(log.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_stops_at_desired_count() {
        let log = RefCell::new(Vec::new());
        let collected = collect(listing(1000, &log), 25).await.unwrap();
        assert_eq!(collected.items.len(), 25);
        assert_eq!(collected.fetches, 1);
        assert!(!collected.exhausted);
        assert_eq!(collected.next_offset, 25);
        assert_eq!(*log.borrow(), vec![(25, 0)]);
    }

    #[tokio::test]
    async fn test_short_page_means_exhausted() {
        let log = RefCell::new(Vec::new());
        let collected = collect(listing(7, &log), 25).await.unwrap();
        assert_eq!(collected.into_items(), (0..7).collect::<Vec<_>>());
        assert_eq!(log.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_member_pages_take_ceil_n_over_p_fetches() {
        // 210 members, pages of 200: one full page, then one short page.
        let log = RefCell::new(Vec::new());
        let mut offset = 0;
        let mut pages = Vec::new();
        loop {
            let page = collect_from(listing(210, &log), offset, 200).await.unwrap();
            pages.push(page.items.len());
            if page.exhausted {
                break;
            }
            offset = page.next_offset;
        }
        assert_eq!(pages, vec![200, 10]);
        assert_eq!(*log.borrow(), vec![(200, 0), (200, 200)]);
        // Never asks for more than a page beyond the end of the listing.
        assert!(log.borrow().iter().all(|(limit, offset)| offset + limit <= 210 + 200));
    }

    #[tokio::test]
    async fn test_filter_refetches_with_growing_offsets() {
        let log = RefCell::new(Vec::new());
        // Reject even numbers: every page under-delivers by half.
        let collected = PageWalk::new(listing(100, &log), 10)
            .run(|n: &usize| n % 2 == 1)
            .await
            .unwrap();
        let items: Vec<usize> = collected.items.iter().map(|p| p.item).collect();
        assert_eq!(items, vec![1, 3, 5, 7, 9, 11, 13, 15, 17, 19]);
        assert_eq!(
            *log.borrow(),
            vec![(10, 0), (5, 10), (3, 15), (1, 18), (1, 19)]
        );
        assert_eq!(collected.items.last().map(|p| p.page), Some(4));
    }

    #[tokio::test]
    async fn test_state_machine_transitions() {
        let log = RefCell::new(Vec::new());
        let mut walk = PageWalk::new(listing(3, &log), 5);
        let mut accept = |_: &usize| true;

        assert_eq!(*walk.state(), WalkState::Fetching);
        walk.step(&mut accept).await.unwrap();
        assert_eq!(*walk.state(), WalkState::Filtering(vec![0, 1, 2]));
        walk.step(&mut accept).await.unwrap();
        assert_eq!(*walk.state(), WalkState::Exhausted);
        assert_eq!(walk.accepted(), 3);

        // Finished walks do not fetch again.
        walk.step(&mut accept).await.unwrap();
        assert_eq!(log.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let failing = |_: usize, _: usize| ready(Err::<Vec<u8>, _>(AppError::directory("down")));
        let err = collect(failing, 5).await.unwrap_err();
        assert_eq!(err.message, "down");
    }
}
