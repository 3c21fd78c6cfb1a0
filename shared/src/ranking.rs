use crate::{GithubHandle, ScoreMap, ScoreModel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub rank: usize,
    pub login: GithubHandle,
    pub score: ScoreModel,
}

/// Orders users by total, highest first, using competition ranking: equal
/// totals share a rank and the next rank skips accordingly (1, 1, 3).
/// Ties keep the map's order.
pub fn rank(scores: &ScoreMap) -> Vec<RankedEntry> {
    let mut sorted: Vec<_> = scores.iter().collect();
    sorted.sort_by(|(_, a), (_, b)| b.total().cmp(&a.total()));

    let mut result: Vec<RankedEntry> = Vec::with_capacity(sorted.len());
    for (position, (login, score)) in sorted.into_iter().enumerate() {
        let rank = match result.last() {
            Some(previous) if previous.score.total() == score.total() => previous.rank,
            _ => position + 1,
        };
        result.push(RankedEntry {
            rank,
            login: login.clone(),
            score: *score,
        });
    }
    result
}

/// Keeps only the listed users. Matching ignores ASCII case; an empty filter keeps everyone.
pub fn filter_users<S: AsRef<str>>(scores: &ScoreMap, users: &[S]) -> ScoreMap {
    if users.is_empty() {
        return scores.clone();
    }

    scores
        .iter()
        .filter(|(login, _)| {
            users
                .iter()
                .any(|user| user.as_ref().eq_ignore_ascii_case(login))
        })
        .map(|(login, score)| (login.clone(), *score))
        .collect()
}

/// Case-insensitive lookup of a single user.
pub fn find_user<'a>(scores: &'a ScoreMap, user: &str) -> Option<(&'a GithubHandle, &'a ScoreModel)> {
    scores
        .iter()
        .find(|(login, _)| login.eq_ignore_ascii_case(user))
}
