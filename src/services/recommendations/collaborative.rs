use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Course, CourseScore, Enrollment},
    services::readers::{EnrollmentQuery, EnrollmentReader},
};

use super::{profile::LearnerHistory, rank_descending, RecommendationSettings};

/// Courses popular among peers, ranked by how many peers enrolled in them
///
/// A peer is any other learner who passed one of the target's completed
/// courses. Peer enrollments are read regardless of course status; only
/// published, unenrolled candidates can surface.
pub async fn recommend<'a>(
    reader: &dyn EnrollmentReader,
    learner_id: Uuid,
    history: &LearnerHistory,
    candidates: &[&'a Course],
    settings: &RecommendationSettings,
) -> AppResult<Vec<CourseScore<'a>>> {
    if history.completed.is_empty() {
        return Ok(Vec::new());
    }

    let completed_ids = history.completed_ids();
    let overlapping = reader
        .enrollments_by_learners(
            &EnrollmentQuery::for_courses(completed_ids.iter().copied().collect())
                .excluding_learner(learner_id),
        )
        .await?;

    let peers = discover_peers(
        learner_id,
        &completed_ids,
        &overlapping,
        settings.completion_threshold,
    );

    if peers.is_empty() {
        tracing::debug!(learner_id = %learner_id, "No peers found");
        return Ok(Vec::new());
    }

    let peer_enrollments = reader
        .enrollments_by_learners(&EnrollmentQuery::for_learners(
            peers.iter().copied().collect(),
        ))
        .await?;

    let ranked = rank_by_peer_frequency(
        &peers,
        &peer_enrollments,
        &history.enrolled_ids,
        candidates,
        settings.max_results,
    );

    tracing::debug!(
        learner_id = %learner_id,
        peer_count = peers.len(),
        peer_enrollments = peer_enrollments.len(),
        ranked = ranked.len(),
        "Collaborative candidates pooled"
    );

    Ok(ranked)
}

/// Distinct learners, other than the target, who passed a course the target
/// completed. A single shared course is enough.
pub fn discover_peers(
    learner_id: Uuid,
    completed_ids: &HashSet<Uuid>,
    enrollments: &[Enrollment],
    completion_threshold: u8,
) -> HashSet<Uuid> {
    enrollments
        .iter()
        .filter(|e| e.learner_id != learner_id)
        .filter(|e| completed_ids.contains(&e.course_id))
        .filter(|e| e.has_passed(completion_threshold))
        .map(|e| e.learner_id)
        .collect()
}

/// Counts peer enrollments per course the target has not enrolled in and
/// ranks the eligible candidates by that count
pub fn rank_by_peer_frequency<'a>(
    peers: &HashSet<Uuid>,
    peer_enrollments: &[Enrollment],
    enrolled_ids: &HashSet<Uuid>,
    candidates: &[&'a Course],
    limit: usize,
) -> Vec<CourseScore<'a>> {
    let mut frequency: HashMap<Uuid, usize> = HashMap::new();
    for enrollment in peer_enrollments {
        if peers.contains(&enrollment.learner_id) && !enrolled_ids.contains(&enrollment.course_id)
        {
            *frequency.entry(enrollment.course_id).or_default() += 1;
        }
    }

    let scored = candidates
        .iter()
        .filter_map(|&course| {
            frequency.get(&course.id).map(|count| CourseScore {
                course,
                score: *count as f64,
            })
        })
        .collect();

    rank_descending(scored, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::LearnerEnrollment;
    use crate::services::readers::MockEnrollmentReader;

    fn completed_history(learner: Uuid, courses: &[&Course]) -> LearnerHistory {
        let enrollments: Vec<LearnerEnrollment> = courses
            .iter()
            .map(|course| LearnerEnrollment {
                enrollment: Enrollment::new(learner, course.id).with_progress(100),
                course: (*course).clone(),
            })
            .collect();
        LearnerHistory::from_enrollments(&enrollments, 70)
    }

    #[test]
    fn test_discover_peers_requires_passing_progress() {
        let target = Uuid::new_v4();
        let course = Uuid::new_v4();
        let passed = Uuid::new_v4();
        let dabbled = Uuid::new_v4();
        let marked_only = Uuid::new_v4();

        let enrollments = vec![
            Enrollment::new(passed, course).with_progress(70),
            Enrollment::new(dabbled, course).with_progress(40),
            Enrollment::new(marked_only, course)
                .with_progress(10)
                .completed_on(chrono::Utc::now()),
            Enrollment::new(target, course).with_progress(100),
            Enrollment::new(Uuid::new_v4(), Uuid::new_v4()).with_progress(100),
        ];

        let peers = discover_peers(target, &HashSet::from([course]), &enrollments, 70);
        assert_eq!(peers, HashSet::from([passed]));
    }

    #[test]
    fn test_rank_by_peer_frequency_orders_by_count() {
        let peers: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        let popular = Course::new("Popular");
        let niche = Course::new("Niche");
        let enrolled = Course::new("Already mine");

        let peer_enrollments = vec![
            Enrollment::new(peers[0], niche.id),
            Enrollment::new(peers[0], popular.id),
            Enrollment::new(peers[1], popular.id),
            Enrollment::new(peers[2], enrolled.id),
        ];

        let peer_set: HashSet<Uuid> = peers.iter().copied().collect();
        let ranked = rank_by_peer_frequency(
            &peer_set,
            &peer_enrollments,
            &HashSet::from([enrolled.id]),
            &[&niche, &popular],
            8,
        );

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].course.id, popular.id);
        assert_eq!(ranked[0].score, 2.0);
        assert_eq!(ranked[1].course.id, niche.id);
    }

    #[test]
    fn test_rank_skips_courses_outside_candidate_pool() {
        let peer = Uuid::new_v4();
        let draft_id = Uuid::new_v4();

        let ranked = rank_by_peer_frequency(
            &HashSet::from([peer]),
            &[Enrollment::new(peer, draft_id)],
            &HashSet::new(),
            &[],
            8,
        );

        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn test_recommend_skips_reads_without_completions() {
        let mut reader = MockEnrollmentReader::new();
        reader.expect_enrollments_by_learners().never();

        let result = recommend(
            &reader,
            Uuid::new_v4(),
            &LearnerHistory::default(),
            &[],
            &RecommendationSettings::default(),
        )
        .await
        .unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_recommend_pools_peer_enrollments() {
        let target = Uuid::new_v4();
        let peer = Uuid::new_v4();
        let shared = Course::new("Shared");
        let next = Course::new("Next");
        let history = completed_history(target, &[&shared]);

        let mut reader = MockEnrollmentReader::new();
        let shared_id = shared.id;
        let next_id = next.id;
        reader
            .expect_enrollments_by_learners()
            .times(2)
            .returning(move |query| {
                if query.course_ids.is_some() {
                    Ok(vec![Enrollment::new(peer, shared_id).with_progress(90)])
                } else {
                    Ok(vec![
                        Enrollment::new(peer, shared_id).with_progress(90),
                        Enrollment::new(peer, next_id),
                    ])
                }
            });

        let result = recommend(
            &reader,
            target,
            &history,
            &[&next],
            &RecommendationSettings::default(),
        )
        .await
        .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].course.id, next.id);
    }

    #[tokio::test]
    async fn test_recommend_propagates_reader_failure() {
        let target = Uuid::new_v4();
        let shared = Course::new("Shared");
        let history = completed_history(target, &[&shared]);

        let mut reader = MockEnrollmentReader::new();
        reader
            .expect_enrollments_by_learners()
            .returning(|_| Err(AppError::Unavailable("enrollment store down".into())));

        let result = recommend(
            &reader,
            target,
            &history,
            &[],
            &RecommendationSettings::default(),
        )
        .await;

        assert!(result.is_err());
    }
}
