/// End-to-end checks of the pure scoring engine: security scores feeding the
/// portfolio aggregator and the insight generator.

mod common;

use common::{bars, quality_metrics, trend, weak_metrics};
use mercato_backend::models::{BenchmarkHistory, SecurityMetrics, SecurityScore, SubScores};
use mercato_backend::services::normalizers::{self, Momentum};
use mercato_backend::services::portfolio_service::stability_adjustment;
use mercato_backend::services::{generate_insights, score_portfolio, score_security};

fn fixed_score(ticker: &str, final_score: f64, momentum: f64, stability: f64, change: f64) -> SecurityScore {
    SecurityScore {
        ticker: ticker.into(),
        name: None,
        logo_url: None,
        sector: "Tech".into(),
        price: 100.0,
        price_change_pct: change,
        sub_scores: SubScores {
            financial_health: 0.0,
            profitability: 0.0,
            growth: 0.0,
            momentum,
            stability,
        },
        final_score,
        has_fundamentals: true,
    }
}

// ---------------------------------------------------------------------------
// Security scorer
// ---------------------------------------------------------------------------

#[test]
fn test_every_sub_score_is_bounded() {
    let benchmark = BenchmarkHistory::new("SPY", bars(&trend(400.0, 0.0005, 252)));
    let cases = vec![
        quality_metrics("GOOD", "Tech", &trend(100.0, 0.002, 252)),
        weak_metrics("BAD", "Energy", &trend(50.0, -0.004, 252)),
        weak_metrics("SHORT", "Energy", &[10.0, 9.0, 8.5]),
        SecurityMetrics::from_history("BARE", bars(&[1.0])),
    ];

    for m in &cases {
        let score = score_security(m, Some(&benchmark)).unwrap();
        let s = score.sub_scores;
        for value in [s.financial_health, s.profitability, s.growth, s.momentum, s.stability] {
            assert!((0.0..=20.0).contains(&value), "{}: {} out of range", m.ticker, value);
        }
        assert!((0.0..=100.0).contains(&score.final_score));
        assert!(
            (score.final_score - s.total()).abs() <= 0.3,
            "{}: final {} vs sum {}",
            m.ticker,
            score.final_score,
            s.total()
        );
    }
}

#[test]
fn test_quality_outscores_weak() {
    let benchmark = BenchmarkHistory::new("SPY", bars(&trend(400.0, 0.0005, 252)));
    let good = score_security(&quality_metrics("GOOD", "Tech", &trend(100.0, 0.002, 252)), Some(&benchmark)).unwrap();
    let bad = score_security(&weak_metrics("BAD", "Energy", &trend(50.0, -0.004, 252)), Some(&benchmark)).unwrap();
    assert!(good.final_score > bad.final_score + 30.0, "{} vs {}", good.final_score, bad.final_score);
    assert!(good.sub_scores.momentum > bad.sub_scores.momentum);
}

#[test]
fn test_momentum_fallback_with_short_history_and_no_benchmark() {
    let m = quality_metrics("NEW", "Tech", &trend(20.0, 0.01, 15));
    assert_eq!(normalizers::momentum(&m, None), Momentum::Neutral);
    assert_eq!(score_security(&m, None).unwrap().sub_scores.momentum, 12.0);

    let other = weak_metrics("NEW2", "Energy", &trend(20.0, -0.01, 15));
    assert_eq!(score_security(&other, None).unwrap().sub_scores.momentum, 12.0);
}

#[test]
fn test_debt_ratio_boundary_through_scorer() {
    let mut at_boundary = SecurityMetrics::from_history("EDGE", bars(&[10.0, 10.0]));
    at_boundary.market_cap = 100.0;
    at_boundary.total_debt = 20.0;
    let mut below = at_boundary.clone();
    below.total_debt = 19.0;

    // 0.85 vs 1.0 on one of three terms: a 1.0 point gap on the 0-20 scale
    let edge = score_security(&at_boundary, None).unwrap().sub_scores.financial_health;
    let under = score_security(&below, None).unwrap().sub_scores.financial_health;
    assert!((under - edge - 1.0).abs() < 1e-9, "{} vs {}", under, edge);
}

// ---------------------------------------------------------------------------
// Portfolio + insights
// ---------------------------------------------------------------------------

#[test]
fn test_two_security_single_sector_scenario() {
    let a = fixed_score("A", 80.0, 18.0, 14.0, 1.2);
    let b = fixed_score("B", 40.0, 5.0, 10.0, -0.5);
    let scores = vec![a, b];

    let portfolio = score_portfolio(&scores);
    let expected = 60.0 * 0.88 * stability_adjustment(12.0);
    assert!((portfolio.score - expected).abs() <= 0.05, "{} vs {}", portfolio.score, expected);
    assert!(portfolio.score <= 60.0 * stability_adjustment(12.0) * 0.88 + 0.05);

    // mean momentum 11.5 is neither strong nor weak; 1 of 2 gainers is not a majority
    let insights = generate_insights(&scores);
    assert_eq!(
        insights,
        vec![
            "Top performer: A (80.0/100)".to_string(),
            "Needs attention: B (40.0/100)".to_string(),
        ]
    );
}

#[test]
fn test_single_security_portfolio() {
    let scores = vec![fixed_score("SOLO", 74.0, 10.0, 20.0, 0.4)];
    let insights = generate_insights(&scores);
    assert_eq!(insights[0], "Top performer: SOLO (74.0/100)");
    assert!(!insights.iter().any(|i| i.starts_with("Needs attention")));
    assert_eq!(insights.last().unwrap(), "1 of 1 stocks gained today");

    let portfolio = score_portfolio(&scores);
    assert_eq!(portfolio.score, 65.1);
}

#[test]
fn test_portfolio_from_scored_metrics_is_order_independent() {
    let benchmark = BenchmarkHistory::new("SPY", bars(&trend(400.0, 0.0005, 252)));
    let metrics = vec![
        quality_metrics("AAA", "Tech", &trend(100.0, 0.002, 252)),
        weak_metrics("BBB", "Energy", &trend(50.0, -0.004, 252)),
        quality_metrics("CCC", "Health", &trend(80.0, 0.001, 200)),
        weak_metrics("DDD", "Tech", &trend(30.0, 0.0, 40)),
    ];
    let mut scores: Vec<SecurityScore> = metrics
        .iter()
        .map(|m| score_security(m, Some(&benchmark)).unwrap())
        .collect();

    let forward = score_portfolio(&scores);
    assert_eq!(forward.sector_count, 3);
    assert!((forward.diversification_adjustment - 0.94).abs() < 1e-12);

    scores.rotate_left(1);
    assert_eq!(score_portfolio(&scores), forward);
    scores.reverse();
    assert_eq!(score_portfolio(&scores), forward);
}

#[test]
fn test_empty_collections() {
    assert_eq!(score_portfolio(&[]).score, 0.0);
    assert!(generate_insights(&[]).is_empty());
}
