use std::collections::HashSet;

use layout::{BoundingBox, RunIndex};

use crate::candidate::{group_token_set, jaccard, sort_candidates, MatchCandidate, StrategyKind};
use crate::config::AlignConfig;
use crate::sentence::SentenceRef;
use crate::strategy::Strategy;

/// Keyword-density clustering.
///
/// When consecutive-run comparison fails (heavy fragmentation, interleaved
/// columns), runs dense in the sentence's keywords are clustered spatially
/// and each cluster is scored as a whole. Stopwords never count as
/// keywords, so density stays meaningful in function-word-heavy text.
pub struct KeywordCluster;

impl Strategy for KeywordCluster {
    fn kind(&self) -> StrategyKind {
        StrategyKind::KeywordCluster
    }

    fn propose(
        &self,
        sentence: &SentenceRef,
        index: &RunIndex,
        cfg: &AlignConfig,
    ) -> Vec<MatchCandidate> {
        let runs = index.runs();
        if runs.is_empty() || sentence.keywords.is_empty() {
            return Vec::new();
        }
        let keyword_set: HashSet<&str> = sentence.keywords.iter().map(String::as_str).collect();
        let sent_set: HashSet<&str> = sentence.tokens.iter().map(String::as_str).collect();

        // Pool: runs whose token mass is meaningfully keyword-bearing.
        let pool: Vec<usize> = (0..runs.len())
            .filter(|&pos| {
                let run = &runs[pos];
                if run.tokens.is_empty() {
                    return false;
                }
                let hits = run
                    .tokens
                    .iter()
                    .filter(|t| keyword_set.contains(t.as_str()))
                    .count();
                hits as f32 / run.token_count() as f32 >= cfg.keyword_density_min
            })
            .collect();
        if pool.is_empty() {
            return Vec::new();
        }

        // Greedy centroid clustering in document order.
        let mut clusters: Vec<Cluster> = Vec::new();
        for pos in pool {
            let bbox = runs[pos].bbox;
            match clusters
                .iter_mut()
                .find(|c| c.centroid_distance(&bbox) <= cfg.keyword_cluster_distance)
            {
                Some(cluster) => cluster.push(pos, bbox),
                None => clusters.push(Cluster::seed(pos, bbox)),
            }
        }

        let mut candidates = Vec::new();
        for cluster in clusters {
            let cluster_set = group_token_set(cluster.members.iter().map(|&pos| &runs[pos]));
            let sim = jaccard(&cluster_set, &sent_set);
            if sim < cfg.keyword_accept {
                continue;
            }
            let indices: Vec<u32> = cluster
                .members
                .iter()
                .map(|&pos| runs[pos].stable_index)
                .collect();
            let matched = sent_set.intersection(&cluster_set).count();
            candidates.push(MatchCandidate::new(
                indices,
                sim * cfg.keyword_scale,
                StrategyKind::KeywordCluster,
                matched,
            ));
        }

        sort_candidates(&mut candidates);
        candidates.truncate(cfg.max_candidates_per_strategy);
        candidates
    }
}

struct Cluster {
    members: Vec<usize>,
    sum_x: f32,
    sum_y: f32,
}

impl Cluster {
    fn seed(pos: usize, bbox: BoundingBox) -> Self {
        Self {
            members: vec![pos],
            sum_x: bbox.center_x(),
            sum_y: bbox.center_y(),
        }
    }

    fn push(&mut self, pos: usize, bbox: BoundingBox) {
        self.members.push(pos);
        self.sum_x += bbox.center_x();
        self.sum_y += bbox.center_y();
    }

    fn centroid_distance(&self, bbox: &BoundingBox) -> f32 {
        let n = self.members.len() as f32;
        let dx = self.sum_x / n - bbox.center_x();
        let dy = self.sum_y / n - bbox.center_y();
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layout::TextRun;
    use normalize::NormalizeConfig;

    #[test]
    fn clustered_keyword_runs_form_one_candidate() {
        let ncfg = NormalizeConfig::default();
        let runs = vec![
            TextRun::new(0, 1, "tenant vacate", BoundingBox::new(0.0, 0.0, 60.0, 12.0), &ncfg),
            TextRun::new(1, 1, "within 30 days", BoundingBox::new(70.0, 2.0, 60.0, 12.0), &ncfg),
            // Far away and keyword-free: never joins the cluster.
            TextRun::new(2, 1, "unrelated footer text", BoundingBox::new(0.0, 700.0, 80.0, 12.0), &ncfg),
        ];
        let index = RunIndex::new(1, runs).expect("index builds");
        let sentence = SentenceRef::new(
            "s1",
            "The tenant must vacate within 30 days.",
            &ncfg,
        )
        .expect("sentence");

        let candidates = KeywordCluster.propose(&sentence, &index, &AlignConfig::default());
        let best = candidates.first().expect("candidate");
        assert_eq!(best.run_indices, vec![0, 1]);
        assert_eq!(best.kind, StrategyKind::KeywordCluster);
    }

    #[test]
    fn distant_keyword_runs_stay_in_separate_clusters() {
        let ncfg = NormalizeConfig::default();
        let runs = vec![
            TextRun::new(0, 1, "tenant must vacate premises", BoundingBox::new(0.0, 0.0, 100.0, 12.0), &ncfg),
            TextRun::new(1, 1, "tenant must vacate premises", BoundingBox::new(0.0, 500.0, 100.0, 12.0), &ncfg),
        ];
        let index = RunIndex::new(1, runs).expect("index builds");
        let sentence =
            SentenceRef::new("s1", "tenant must vacate premises", &ncfg).expect("sentence");

        let candidates = KeywordCluster.propose(&sentence, &index, &AlignConfig::default());
        assert_eq!(candidates.len(), 2);
        assert_ne!(candidates[0].run_indices, candidates[1].run_indices);
    }
}
