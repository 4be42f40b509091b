//! Integration tests for the resume tailor

use resume_tailor::config::Config;
use resume_tailor::input::{InputManager, PostingOverrides};
use resume_tailor::processing::job_analyzer::{ExperienceLevel, JobDescription};
use resume_tailor::processing::matcher::{QualityLevel, SCORING_POLICY};
use resume_tailor::processing::resume_generator::TemplateType;
use resume_tailor::{TailorError, TailorOptions, TailoredApplication, TailoringPipeline};
use std::path::Path;

const POSTINGS: [(&str, &str); 5] = [
    (
        "Senior SEO Lead",
        "- 5+ years of SEO experience\n- Google Analytics and keyword research\n- You will lead our organic team",
    ),
    (
        "Frontend Developer",
        "React, TypeScript, HTML and CSS. Docker and Kubernetes are a plus.",
    ),
    (
        "Head of Growth",
        "Leadership of a team of eight, stakeholder management, budget ownership and hiring. 10+ years.",
    ),
    (
        "Marketing Analyst",
        "SQL, BigQuery, Looker Studio and A/B testing for paid search campaigns.",
    ),
    ("Store Assistant", "Friendly and punctual. Weekend availability is a must."),
];

fn pipeline() -> TailoringPipeline {
    TailoringPipeline::from_config(&Config::default()).unwrap()
}

fn tailor(pipeline: &TailoringPipeline, title: &str, description: &str) -> TailoredApplication {
    let job = JobDescription::new(title, "Acme", description).unwrap();
    pipeline
        .run(
            &job,
            TailorOptions {
                template: None,
                cover_letter: true,
            },
        )
        .unwrap()
}

#[test]
fn test_seo_heavy_posting_selects_seo_template_and_senior_level() {
    let pipeline = pipeline();
    let analysis = pipeline
        .analyze_job_description(
            "We need an SEO lead with 5+ years of experience. Google Analytics and keyword research are essential.",
            "SEO Lead",
            "Acme",
        )
        .unwrap();
    let resume = pipeline.generate_customized_resume(&analysis);

    assert_eq!(resume.metadata.template_type, TemplateType::SeoMarketing);
    assert!(analysis.experience_level >= ExperienceLevel::Senior);
}

#[test]
fn test_generic_posting_scores_weak() {
    let pipeline = pipeline();
    let analysis = pipeline
        .analyze_job_description(
            "We are looking for a friendly person to join our store. Weekend availability is a must.",
            "Store Assistant",
            "Acme",
        )
        .unwrap();
    let resume = pipeline.generate_customized_resume(&analysis);
    let result = pipeline.calculate_match_score(&resume, &analysis);

    assert!(result.total_score < 50, "scored {}", result.total_score);
    assert_eq!(result.quality_level, QualityLevel::Weak);
    assert!(!result.meets_threshold);
}

#[test]
fn test_posting_of_profile_top_skills_gets_full_skills_match() {
    let pipeline = pipeline();
    let analysis = pipeline
        .analyze_job_description(
            "SEO, technical SEO, keyword research, Google Analytics and schema markup.",
            "SEO Specialist",
            "Acme",
        )
        .unwrap();
    let resume = pipeline.generate_customized_resume(&analysis);
    let result = pipeline.calculate_match_score(&resume, &analysis);

    assert_eq!(result.breakdown.skills_match, 1.0);
}

#[test]
fn test_case_and_whitespace_do_not_change_extracted_skills() {
    let pipeline = pipeline();
    let first = pipeline
        .analyze_job_description("SEO and Google Analytics, Python", "Analyst", "Acme")
        .unwrap();
    let second = pipeline
        .analyze_job_description("  seo   and GOOGLE\tanalytics,\n python ", "Analyst", "Acme")
        .unwrap();

    assert_eq!(first.extracted_skills, second.extracted_skills);
}

#[test]
fn test_pipeline_is_deterministic() {
    let pipeline = pipeline();
    for (title, description) in POSTINGS {
        let first = tailor(&pipeline, title, description);
        let second = tailor(&pipeline, title, description);
        assert_eq!(first, second, "{} produced different results", title);
    }
}

#[test]
fn test_resume_only_contains_profile_content() {
    let pipeline = pipeline();
    let profile = pipeline.profile();

    for template in TemplateType::ALL {
        for (title, description) in POSTINGS {
            let job = JobDescription::new(title, "Acme", description).unwrap();
            let application = pipeline
                .run(
                    &job,
                    TailorOptions {
                        template: Some(template),
                        cover_letter: false,
                    },
                )
                .unwrap();
            let resume = &application.resume;

            for skill in resume.all_skills() {
                assert!(profile.has_skill(skill), "invented skill {}", skill);
            }
            for achievement in &resume.achievements {
                assert!(profile.has_achievement(achievement), "invented achievement {}", achievement);
            }
            for position in &resume.work_experience {
                for bullet in &position.description {
                    assert!(profile.has_bullet(bullet), "invented bullet {}", bullet);
                }
            }
        }
    }
}

#[test]
fn test_score_bounds_and_submission_threshold() {
    let pipeline = pipeline();
    for (title, description) in POSTINGS {
        let result = tailor(&pipeline, title, description).match_result;

        assert!(result.total_score <= 100);
        assert_eq!(
            result.meets_threshold,
            result.total_score >= SCORING_POLICY.submission_threshold
        );
        assert_eq!(
            result.quality_level,
            QualityLevel::from_score(result.total_score, &SCORING_POLICY.thresholds)
        );
        for (_, score) in result.breakdown.factors() {
            assert!((0.0..=1.0).contains(&score));
        }
    }
}

#[test]
fn test_default_weights_sum_to_one_hundred() {
    assert_eq!(SCORING_POLICY.weights.sum(), 100);
    assert_eq!(Config::default().scoring.policy().weights.sum(), 100);
}

#[test]
fn test_zero_match_description_has_no_industry() {
    let pipeline = pipeline();
    let analysis = pipeline
        .analyze_job_description("Lorem ipsum dolor sit amet.", "Assistant", "Acme")
        .unwrap();

    assert_eq!(analysis.total_matches(), 0);
    assert_eq!(analysis.industry_context.primary, None);
    assert_eq!(analysis.industry_context.confidence, 0.0);
    assert_eq!(analysis.experience_level, ExperienceLevel::Mid);
}

#[test]
fn test_blank_company_is_rejected() {
    let pipeline = pipeline();
    let result = pipeline.analyze_job_description("SEO", "SEO Lead", "   ");
    assert!(matches!(
        result,
        Err(TailorError::Validation { field: "company", .. })
    ));
}

#[tokio::test]
async fn test_markdown_posting_with_header_fields() {
    let mut manager = InputManager::new();
    let job = manager
        .load_posting(
            Path::new("tests/fixtures/seo_lead.md"),
            &PostingOverrides::default(),
        )
        .await
        .unwrap();

    assert_eq!(job.title, "Senior SEO Lead");
    assert_eq!(job.company, "Northstar Outdoor");
    assert_eq!(job.location.as_deref(), Some("Remote (UK)"));
    assert!(job.description.contains("- Own technical SEO"));
    assert!(!job.description.contains("**"));

    let application = pipeline().run(&job, TailorOptions::default()).unwrap();
    assert_eq!(application.resume.metadata.template_type, TemplateType::SeoMarketing);
    assert!(application.match_result.meets_threshold);
}

#[tokio::test]
async fn test_plain_posting_needs_title_and_company() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/generic_posting.txt");

    let missing = manager.load_posting(path, &PostingOverrides::default()).await;
    assert!(matches!(missing, Err(TailorError::Validation { field: "title", .. })));

    let job = manager
        .load_posting(
            path,
            &PostingOverrides {
                title: Some("Store Assistant".to_string()),
                company: Some("Corner Shop".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(job.company, "Corner Shop");
    assert!(job.description.starts_with("We are looking for"));
}

#[tokio::test]
async fn test_json_posting_fields() {
    let mut manager = InputManager::new();
    let job = manager
        .load_posting(
            Path::new("tests/fixtures/posting.json"),
            &PostingOverrides {
                title: Some("Senior Marketing Analyst".to_string()),
                company: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(job.title, "Senior Marketing Analyst");
    assert_eq!(job.company, "Brightline");
    assert_eq!(job.salary.as_deref(), Some("£45,000"));
}

#[tokio::test]
async fn test_unsupported_and_missing_files() {
    let mut manager = InputManager::new();

    let unsupported = manager
        .load_posting(
            Path::new("tests/fixtures/unsupported.xyz"),
            &PostingOverrides::default(),
        )
        .await;
    assert!(matches!(unsupported, Err(TailorError::UnsupportedFormat(_))));

    let missing = manager
        .load_posting(
            Path::new("tests/fixtures/does_not_exist.md"),
            &PostingOverrides::default(),
        )
        .await;
    assert!(matches!(missing, Err(TailorError::InvalidInput(_))));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/posting.json");

    let first = manager.load_posting(path, &PostingOverrides::default()).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let second = manager.load_posting(path, &PostingOverrides::default()).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_disabled_cache_keeps_nothing() {
    let mut manager = InputManager::new().with_cache(false);
    let path = Path::new("tests/fixtures/posting.json");

    manager.load_posting(path, &PostingOverrides::default()).await.unwrap();
    manager.load_posting(path, &PostingOverrides::default()).await.unwrap();
    assert_eq!(manager.cache_size(), 0);
}
