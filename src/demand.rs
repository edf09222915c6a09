//! Boundary normalization: loose [`Order`] lines become tagged [`CutRequest`]s.

use crate::config::clamp_mm;
use crate::order::{Order, ProfileLine};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Most pieces one profile group may request. Demand beyond it is dropped.
pub const MAX_PIECES_PER_PROFILE: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInfo {
    pub id: String,
    pub name: String,
    pub stock_length_mm: f64,
    /// kg per metre
    pub unit_weight_kg_m: f64,
    pub painted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieceDemand {
    pub length_mm: f64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutRequest {
    pub profile: ProfileInfo,
    pub pieces: Vec<PieceDemand>,
}

impl CutRequest {
    pub fn piece_count(&self) -> usize {
        self.pieces.iter().map(|p| p.count as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.piece_count() == 0
    }

    /// Flat multiset of piece lengths, longest first. Equal lengths keep demand order.
    pub fn expand_sorted(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.piece_count());
        for p in &self.pieces {
            out.extend(std::iter::repeat(p.length_mm).take(p.count as usize));
        }
        out.sort_by(|a, b| b.total_cmp(a));
        out
    }
}

/// What the normalization step had to discard or coerce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationReport {
    pub lines_seen: usize,
    pub lines_without_id: usize,
    pub lines_zeroed: usize,
    /// Lines whose count was cut down to stay within [`MAX_PIECES_PER_PROFILE`].
    pub lines_clamped: usize,
}

/// Piece count for a raw `kesim_adedi` value. Fractions are floored.
pub fn normalize_count(raw: Option<f64>) -> u32 {
    match raw {
        Some(v) if v.is_finite() && v >= 1.0 => {
            if v >= u32::MAX as f64 {
                u32::MAX
            } else {
                v.floor() as u32
            }
        }
        _ => 0,
    }
}

pub fn normalize_length(raw: Option<f64>) -> f64 {
    raw.map(clamp_mm).unwrap_or(0.0)
}

fn line_painted(line: &ProfileLine) -> bool {
    line.boyali.or(line.profil.boyali).unwrap_or(false)
}

pub fn aggregate(order: &Order) -> Vec<CutRequest> {
    aggregate_with_report(order).0
}

/// Groups demand lines by `(profile id, painted)` in first-seen order.
pub fn aggregate_with_report(order: &Order) -> (Vec<CutRequest>, NormalizationReport) {
    let mut report = NormalizationReport::default();
    let mut requests: Vec<CutRequest> = Vec::new();
    let mut index: HashMap<(String, bool), usize> = HashMap::new();

    for line in order.lines() {
        report.lines_seen += 1;

        let Some(id) = line.profil_id.clone() else {
            report.lines_without_id += 1;
            warn!("Dropping demand line without profil_id: {:?}", line);
            continue;
        };
        let painted = line_painted(line);

        let slot = *index.entry((id.clone(), painted)).or_insert_with(|| {
            requests.push(CutRequest {
                profile: ProfileInfo {
                    id: id.clone(),
                    name: String::new(),
                    stock_length_mm: 0.0,
                    unit_weight_kg_m: 0.0,
                    painted,
                },
                pieces: Vec::new(),
            });
            requests.len() - 1
        });
        let req = &mut requests[slot];

        // First line that carries a usable value wins.
        if req.profile.name.is_empty() {
            if let Some(name) = &line.profil.profil_isim {
                req.profile.name = name.clone();
            }
        }
        if req.profile.stock_length_mm <= 0.0 {
            req.profile.stock_length_mm = normalize_length(line.profil.boy_uzunluk);
        }
        if req.profile.unit_weight_kg_m <= 0.0 {
            req.profile.unit_weight_kg_m = normalize_length(line.profil.birim_agirlik);
        }

        let length = normalize_length(line.hesaplanan_degerler.kesim_olcusu);
        let count = normalize_count(line.hesaplanan_degerler.kesim_adedi);
        if length <= 0.0 || count == 0 {
            report.lines_zeroed += 1;
            debug!(
                "Profile {}: line contributes no pieces (length={:?}, count={:?})",
                id, line.hesaplanan_degerler.kesim_olcusu, line.hesaplanan_degerler.kesim_adedi
            );
            continue;
        }

        let room = MAX_PIECES_PER_PROFILE.saturating_sub(req.piece_count() as u32);
        let count = if count > room {
            report.lines_clamped += 1;
            warn!(
                "Profile {}: kesim_adedi {:?} exceeds the {} piece limit, keeping {}",
                id, line.hesaplanan_degerler.kesim_adedi, MAX_PIECES_PER_PROFILE, room
            );
            room
        } else {
            count
        };
        if count == 0 {
            continue;
        }

        match req.pieces.iter_mut().find(|p| p.length_mm == length) {
            Some(existing) => existing.count += count,
            None => req.pieces.push(PieceDemand {
                length_mm: length,
                count,
            }),
        }
    }

    for req in &mut requests {
        if req.profile.name.is_empty() {
            req.profile.name = req.profile.id.clone();
        }
    }

    (requests, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_floored_and_clamped() {
        assert_eq!(normalize_count(Some(2.9)), 2);
        assert_eq!(normalize_count(Some(0.5)), 0);
        assert_eq!(normalize_count(Some(-3.0)), 0);
        assert_eq!(normalize_count(Some(f64::NAN)), 0);
        assert_eq!(normalize_count(None), 0);
    }

    #[test]
    fn huge_counts_are_capped_per_profile() {
        let order = Order::from_lines(vec![
            ProfileLine::new("7", "Kasa", 6000.0, 1200.0, 1e12),
            ProfileLine::new("7", "Kasa", 6000.0, 800.0, 5.0),
            ProfileLine::new("8", "Kanat", 6000.0, 800.0, 5.0),
        ]);
        let (requests, report) = aggregate_with_report(&order);

        assert_eq!(requests[0].piece_count(), MAX_PIECES_PER_PROFILE as usize);
        assert_eq!(requests[0].pieces.len(), 1);
        assert_eq!(requests[1].piece_count(), 5);
        assert_eq!(report.lines_clamped, 2);
        assert_eq!(report.lines_zeroed, 0);
    }

    #[test]
    fn expand_sorted_is_descending() {
        let req = CutRequest {
            profile: ProfileInfo {
                id: "1".into(),
                name: "x".into(),
                stock_length_mm: 6000.0,
                unit_weight_kg_m: 0.0,
                painted: false,
            },
            pieces: vec![
                PieceDemand {
                    length_mm: 500.0,
                    count: 2,
                },
                PieceDemand {
                    length_mm: 1500.0,
                    count: 1,
                },
            ],
        };
        assert_eq!(req.expand_sorted(), vec![1500.0, 500.0, 500.0]);
    }
}
