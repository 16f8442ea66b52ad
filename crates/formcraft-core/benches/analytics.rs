use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use uuid::Uuid;

use formcraft_core::analytics::compute_analytics;
use formcraft_core::model::*;
use formcraft_core::response::*;

fn make_form() -> Form {
    Form {
        id: "bench".into(),
        title: "Bench form".into(),
        header_image: None,
        questions: vec![Question {
            title: "Fill in".into(),
            header_image: None,
            kind: QuestionKind::Cloze(ClozeQuestion {
                text: "[a] [b] [c]".into(),
                blanks: vec!["a".into(), "b".into(), "c".into()],
                blank_options: Default::default(),
            }),
        }],
        created_at: None,
        updated_at: None,
    }
}

fn make_responses(count: usize) -> Vec<Response> {
    (0..count)
        .map(|i| {
            let blanks: Vec<GradedBlank> = (0..3u32)
                .map(|b| GradedBlank {
                    blank_index: b,
                    user_answer: "x".into(),
                    correct_answer: Some("x".into()),
                    is_correct: (i + b as usize) % 2 == 0,
                })
                .collect();
            let earned = blanks.iter().filter(|b| b.is_correct).count() as f64;
            Response {
                id: Uuid::new_v4(),
                form_id: "bench".into(),
                answers: vec![GradedAnswer {
                    question_index: 0,
                    question_type: QuestionType::Cloze,
                    items: GradedItems::Blanks(blanks),
                    total_points_earned: earned,
                    max_possible_points: 3.0,
                }],
                total_score: earned,
                max_score: 3.0,
                percentage_score: percentage(earned, 3.0),
                submitted_at: Utc::now(),
            }
        })
        .collect()
}

fn bench_compute_analytics(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_analytics");
    let form = make_form();

    for size in [10usize, 100, 1000] {
        let responses = make_responses(size);
        group.bench_function(format!("{size}_responses"), |b| {
            b.iter(|| compute_analytics(black_box(&form), black_box(&responses)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compute_analytics);
criterion_main!(benches);
