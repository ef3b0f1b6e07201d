//! Burst clustering over timestamped photos.
//!
//! Photos chain into a cluster while each next photo falls inside the
//! reachable window of some earlier member: every accepted photo pushes the
//! reachable end forward by a full window. A cluster's span can therefore
//! grow far past a single window as long as photos keep arriving, which is
//! what distinguishes a burst from a fixed-width time bucket.

use chrono::{DateTime, Duration, Utc};

/// A photo suitable for clustering.
///
/// This trait lets clustering work with different photo representations
/// (e.g., `PhotoRecord` from camroll-db, or test fixtures).
pub trait ClusterablePhoto {
    /// Returns the photo's unique ID.
    fn photo_uuid(&self) -> &str;

    /// Returns the capture time, if known.
    fn taken_at(&self) -> Option<DateTime<Utc>>;
}

/// A maximal chain-linked run of photos under one window.
///
/// Holds references into the caller's slice, ordered by ascending capture
/// time. [`find_clusters`] only ever emits clusters with two or more
/// members.
#[derive(Debug)]
pub struct Cluster<'a, P> {
    members: Vec<&'a P>,
    started_at: DateTime<Utc>,
    ended_at: DateTime<Utc>,
}

impl<'a, P> Cluster<'a, P> {
    /// Member photos in capture order.
    pub fn members(&self) -> &[&'a P] {
        &self.members
    }

    /// Number of photos in the cluster.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Capture time of the first photo.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Capture time of the last photo.
    pub const fn ended_at(&self) -> DateTime<Utc> {
        self.ended_at
    }

    /// Time between the first and last capture.
    pub fn span(&self) -> Duration {
        self.ended_at - self.started_at
    }
}

/// Group photos into temporal clusters.
///
/// # Algorithm
///
/// 1. Drop photos without a capture time
/// 2. Sort the rest ascending by capture time, ties broken by uuid
/// 3. Seed a candidate cluster at the scan cursor; its reachable end is the
///    seed's time plus the window
/// 4. Pull in every following photo whose time is `<=` the reachable end
///    (boundary-equal times chain), extending the end to that photo's time
///    plus the window whenever that lies later
/// 5. Emit candidates with two or more members; a photo whose window caught
///    nothing is not a cluster and the scan moves on by one
///
/// Returned clusters never share a photo and are ordered by start time.
/// A zero window chains only photos with identical capture times, and a
/// negative window chains nothing; both fall out of the same `<=` scan
/// without special casing.
///
/// # Arguments
///
/// * `photos` - Photos to scan (must implement [`ClusterablePhoto`])
/// * `window` - Maximum gap between chained captures
pub fn find_clusters<P: ClusterablePhoto>(photos: &[P], window: Duration) -> Vec<Cluster<'_, P>> {
    let mut timed: Vec<(DateTime<Utc>, &P)> = photos
        .iter()
        .filter_map(|photo| photo.taken_at().map(|taken| (taken, photo)))
        .collect();

    if timed.is_empty() {
        return Vec::new();
    }

    timed.sort_by_key(|&(taken, photo)| (taken, photo.photo_uuid()));

    let mut clusters = Vec::new();
    let mut i = 0;
    while i < timed.len() {
        let (seed_time, seed) = timed[i];
        let mut members = vec![seed];
        let mut last_time = seed_time;
        let mut end = window_end(seed_time, window);

        let mut j = i + 1;
        while j < timed.len() && timed[j].0 <= end {
            let (taken, photo) = timed[j];
            members.push(photo);
            end = end.max(window_end(taken, window));
            last_time = taken;
            j += 1;
        }

        if members.len() > 1 {
            tracing::debug!(
                size = members.len(),
                started_at = %seed_time,
                "found cluster"
            );
            clusters.push(Cluster {
                members,
                started_at: seed_time,
                ended_at: last_time,
            });
            i = j;
        } else {
            i += 1;
        }
    }

    clusters
}

/// Reachable end for a capture at `taken`. Saturates at the calendar bounds
/// so an absurdly large window cannot overflow the datetime arithmetic.
fn window_end(taken: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    taken.checked_add_signed(window).unwrap_or_else(|| {
        if window < Duration::zero() {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        }
    })
}

/// Drops clusters smaller than `min_size`.
///
/// Applied by callers after [`find_clusters`] so temporal grouping and size
/// thresholding stay independently testable. Since emitted clusters always
/// have at least two members, any `min_size <= 2` keeps everything.
pub fn filter_min_size<P>(clusters: Vec<Cluster<'_, P>>, min_size: usize) -> Vec<Cluster<'_, P>> {
    clusters
        .into_iter()
        .filter(|cluster| cluster.len() >= min_size)
        .collect()
}
