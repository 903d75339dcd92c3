use checklist_triage::*;

const VACATION: &str = "\
- [ ] Plan vacation
  - [ ] Book flights
  - [ ] Reserve hotel
  - [ ] Plan itinerary
  - [ ] Research visa requirements
";

const NOTES: &str = "\
# Week 12

Some prose that is not a task.

- [ ] Launch website #project/site #id/launch #due/2024-04-02
  - [ ] Design landing page
  - [ ] Design pricing page

  - [ ] Implement contact form
  - [x] Write unit tests
  - [ ] Test payment flow
  - [ ] Deploy to production
  - [ ] Check analytics
* [x] Renew domain #B #parent/launch
- [ ] Call plumber 2024-04-05 #personal/home
    - [ ] check boiler
Trailing paragraph.
  - [ ] Orphan subtask becomes a task
";

#[test]
fn vacation_example() {
    let config = Config::default();
    let tasks = parse_document_at(VACATION, "trip.md", &config, 0);
    assert_eq!(tasks.len(), 1);

    let task = &tasks[0];
    assert_eq!(task.title, "Plan vacation");
    assert_eq!(task.subtask_count(), 4);
    assert_eq!(task.priority_tier, PriorityTier::B);
    assert!(task.is_auto_priority);
    assert_eq!(task.allocated_time, 30);
    assert_eq!(task.remaining_time, 30);

    let scores: Vec<u8> = task.subtasks.iter().map(|s| s.complexity).collect();
    assert_eq!(scores, vec![1, 1, 1, 3]);

    let report = analyze(task);
    assert_eq!(report.estimated_time, 60);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].kind, IssueKind::TimeMismatch);
    assert_eq!(report.issues[0].severity, Severity::High);
    assert_eq!(report.recommended_action, RecommendedAction::Required);
}

#[test]
fn mixed_document() {
    let config = Config::default();
    let mut tasks = parse_document_at(NOTES, "notes.md", &config, 0);
    link_relationships(&mut tasks);

    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Launch website", "Renew domain", "Call plumber 2024-04-05", "Orphan subtask becomes a task"]);

    let launch = &tasks[0];
    assert_eq!(launch.subtask_count(), 7);
    assert_eq!(launch.priority_tier, PriorityTier::A);
    assert_eq!(launch.assigned_date, chrono::NaiveDate::from_ymd_opt(2024, 4, 2));
    assert!(launch.subtasks[3].completed);
    assert!(launch.child_ids.contains(&tasks[1].id));

    let domain = &tasks[1];
    assert!(domain.completed);
    assert_eq!(domain.priority_tier, PriorityTier::B);
    assert!(!domain.is_auto_priority);
    assert_eq!(domain.remaining_time, 0);
    assert_eq!(domain.parent_id.as_deref(), Some(launch.id.as_str()));

    let plumber = &tasks[2];
    assert_eq!(plumber.assigned_date, chrono::NaiveDate::from_ymd_opt(2024, 4, 5));
    assert_eq!(plumber.subtasks[0].complexity, 1);

    let groups = group_by_project(&tasks);
    assert_eq!(groups["project/site"].len(), 1);
    assert_eq!(groups["personal/home"].len(), 1);
    assert_eq!(groups["uncategorized"].len(), 2);

    let suggestions = suggest_breakdown(launch, &config);
    let names: Vec<&str> = suggestions.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(names, vec!["Launch website - Design", "Launch website - Testing"]);
    assert!(suggestions.iter().all(|s| s.subtasks.len() >= 2));
}

#[test]
fn reparsing_rendered_blocks_is_stable() {
    let config = Config::default();
    // Rendered blocks are rejoined without the prose between them, so a
    // task that only stood alone because of that prose is left out.
    let text = NOTES.replace("  - [ ] Orphan subtask becomes a task\n", "");
    let first = parse_document_at(&text, "notes.md", &config, 0);
    let rendered: Vec<String> = first.iter().map(|t| serialize_block(t, &config)).collect();
    let second = parse_document_at(&rendered.join("\n"), "notes.md", &config, 0);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.title, b.title);
        assert_eq!(a.tags, b.tags);
        assert_eq!(a.priority_tier, b.priority_tier);
        assert_eq!(a.is_auto_priority, b.is_auto_priority);
        assert_eq!(a.allocated_time, b.allocated_time);
        assert_eq!(a.estimated_time, b.estimated_time);
        assert_eq!(a.completed, b.completed);
        assert_eq!(a.assigned_date, b.assigned_date);
        assert_eq!(a.date_from_tag, b.date_from_tag);
        let subs = |t: &TaskRecord| t.subtasks.iter().map(|s| (s.title.clone(), s.completed, s.complexity)).collect::<Vec<_>>();
        assert_eq!(subs(a), subs(b));
    }

    let rerendered: Vec<String> = second.iter().map(|t| serialize_block(t, &config)).collect();
    assert_eq!(rendered, rerendered);
}

#[test]
fn custom_date_format_survives_repeated_rendering() {
    let config = Config::from_toml("date_tag_template = \"#on/%date%\"\ndate_format = \"%d.%m.%Y\"\n").unwrap();
    let mut line = "- [ ] Call #on/03.06.2024 #B".to_owned();
    for _ in 0..3 {
        let task = parse_document_at(&line, "t.md", &config, 0).remove(0);
        assert_eq!(task.title, "Call");
        assert_eq!(task.assigned_date, chrono::NaiveDate::from_ymd_opt(2024, 6, 3));
        line = serialize(&task, &config);
    }
    assert_eq!(line, "- [ ] Call #on/03.06.2024 #B");
}

#[test]
fn parent_tags_resolve_record_ids() {
    let config = Config::default();
    let first = parse_document_at("- [ ] Kitchen\n", "plans/home reno.md", &config, 0);
    let id = first[0].id.clone();
    assert_eq!(id, "plans/home-reno-0");

    let mut tasks = first;
    tasks.extend(parse_document_at(&format!("- [ ] Buy tiles #parent/{id}\n"), "shopping.md", &config, 0));
    link_relationships(&mut tasks);
    assert_eq!(tasks[1].parent_id.as_deref(), Some(id.as_str()));
    assert!(tasks[0].child_ids.contains(&tasks[1].id));
}

#[test]
fn auto_fix_leaves_manual_tasks_alone() {
    let config = Config::default();
    let tasks = parse_document_at(NOTES, "notes.md", &config, 0);
    for task in &tasks {
        let result = auto_fix(task, &config);
        assert!(!result.fixed, "{}: {:?}", task.title, result.changes);
    }
}

#[test]
fn custom_thresholds_change_classification() {
    let config = Config::from_toml("[thresholds]\na = 5\nb = 3\nc = 1\n[time]\nd = 15\n").unwrap();
    let tasks = parse_document_at(VACATION, "trip.md", &config, 0);
    assert_eq!(tasks[0].priority_tier, PriorityTier::B);

    let single = parse_document_at("- [ ] Tidy\n", "t.md", &config, 0);
    assert_eq!(single[0].priority_tier, PriorityTier::D);
    assert_eq!(single[0].allocated_time, 15);
}
