use crate::models::SecurityScore;

const STRONG_MOMENTUM_ABOVE: f64 = 15.0;
const WEAK_MOMENTUM_BELOW: f64 = 8.0;

/// Short observations about a scored collection, in a fixed order: top
/// performer, weakest holding, momentum posture, breadth of today's gainers.
/// Each rule fires independently.
pub fn generate_insights(scores: &[SecurityScore]) -> Vec<String> {
    let mut insights = Vec::new();

    let Some(best) = first_by(scores, |candidate, current| candidate > current) else {
        return insights;
    };
    insights.push(format!(
        "Top performer: {} ({:.1}/100)",
        best.display_name(),
        best.final_score
    ));

    if scores.len() > 1 {
        if let Some(worst) = first_by(scores, |candidate, current| candidate < current) {
            insights.push(format!(
                "Needs attention: {} ({:.1}/100)",
                worst.display_name(),
                worst.final_score
            ));
        }
    }

    let avg_momentum =
        scores.iter().map(|s| s.sub_scores.momentum).sum::<f64>() / scores.len() as f64;
    if avg_momentum > STRONG_MOMENTUM_ABOVE {
        insights.push("Strong momentum across portfolio".to_string());
    } else if avg_momentum < WEAK_MOMENTUM_BELOW {
        insights.push("Weak momentum detected".to_string());
    }

    let gainers = scores.iter().filter(|s| s.price_change_pct > 0.0).count();
    if gainers * 2 > scores.len() {
        insights.push(format!("{} of {} stocks gained today", gainers, scores.len()));
    }

    insights
}

// Earliest entry wins ties: a later entry replaces the current pick only when
// strictly better.
fn first_by(
    scores: &[SecurityScore],
    better: impl Fn(f64, f64) -> bool,
) -> Option<&SecurityScore> {
    scores.iter().fold(None, |current: Option<&SecurityScore>, candidate| match current {
        Some(c) if !better(candidate.final_score, c.final_score) => Some(c),
        _ => Some(candidate),
    })
}
