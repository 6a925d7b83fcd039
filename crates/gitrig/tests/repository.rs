//! Integration tests against a real `git` binary.

mod common;

use std::fs;

use common::*;
use gitrig::{CommitOptions, GitError, Repository, StatusEntry};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const EMPTY_TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

#[test]
fn init_add_commit_status() {
    let (_tmp, repo) = init_repo();
    assert!(!repo.is_bare());

    let path = write(&repo, "hello.txt", "hello\n");
    repo.add([&path]).unwrap();
    repo.commit(no_paths(), Some("init"), CommitOptions::default())
        .unwrap();

    let head = repo.rev_parse("HEAD").unwrap().unwrap();
    assert!(is_hex_id(&head), "not an object id: {head}");
    assert_eq!(repo.status(no_paths()).unwrap(), vec![]);
    assert_eq!(repo.commit_log("HEAD").unwrap(), "init");
}

#[test]
fn status_lists_staged_changes_in_order() {
    let (_tmp, repo) = init_repo();
    commit_file(&repo, "foo/bar.txt", "one\n", "first");

    let changed = write(&repo, "foo/bar.txt", "two\n");
    let added = write(&repo, "baz.txt", "new\n");
    repo.add([&changed, &added]).unwrap();

    let mut status = repo.status(no_paths()).unwrap();
    status.sort_by(|a, b| a.path.cmp(&b.path));
    assert_eq!(
        status,
        vec![
            StatusEntry::new("A", "baz.txt"),
            StatusEntry::new("M", "foo/bar.txt"),
        ]
    );

    let only_foo = repo.status([repo.path().join("foo")]).unwrap();
    assert_eq!(only_foo, vec![StatusEntry::new("M", "foo/bar.txt")]);
}

#[test]
fn queries_over_history() {
    let (_tmp, repo) = init_repo();
    let first = commit_file(&repo, "a.txt", "a\n", "first");
    let second = commit_file(&repo, "b.txt", "b\n", "second");
    let branch = current_branch(&repo);

    assert_eq!(repo.rev_list(["HEAD"]).unwrap(), vec![second.clone(), first.clone()]);
    assert_eq!(repo.rev_list([format!("{second}..HEAD")]).unwrap(), Vec::<String>::new());
    assert_eq!(repo.merge_base(&first, &second).unwrap(), Some(first.clone()));
    assert_eq!(repo.name_rev(&second).unwrap(), branch);
    assert_eq!(
        repo.show_ref(&branch).unwrap(),
        Some(format!("refs/heads/{branch}"))
    );

    let mut files = repo.ls_files(Vec::<String>::new()).unwrap();
    files.sort();
    assert_eq!(files, vec!["a.txt", "b.txt"]);

    assert_eq!(
        repo.list_changed_files(&[first.as_str(), second.as_str()], no_paths()).unwrap(),
        vec!["b.txt"]
    );
    write(&repo, "a.txt", "changed\n");
    repo.add(["a.txt"]).unwrap();
    assert_eq!(
        repo.list_changed_files(&["HEAD"], no_paths()).unwrap(),
        vec!["a.txt"]
    );
    assert_eq!(
        repo.list_changed_files(&[first.as_str()], ["b.txt"]).unwrap(),
        vec!["b.txt"]
    );
}

#[test]
fn absence_instead_of_failure() {
    let (_tmp, repo) = init_repo();
    commit_file(&repo, "a.txt", "a\n", "first");

    assert_eq!(repo.rev_parse("no-such-branch").unwrap(), None);
    assert_eq!(repo.merge_base("HEAD", "no-such-branch").unwrap(), None);
    assert_eq!(repo.show_ref("no-such-branch").unwrap(), None);

    assert!(repo.name_rev("no-such-branch").is_err());
}

#[test]
fn stand_in_failure_program() {
    let tmp = TempDir::new().unwrap();
    let settings = gitrig::RunnerSettings {
        program: "false".into(),
        ..gitrig::RunnerSettings::default()
    };
    let repo = Repository::open_with(fake_layout(tmp.path()), settings).unwrap();

    assert_eq!(repo.rev_parse("HEAD").unwrap(), None);
    assert_eq!(repo.merge_base("a", "b").unwrap(), None);
    assert_eq!(repo.show_ref("main").unwrap(), None);

    let failures = [
        repo.symbolic_ref("HEAD", None).map(|_| ()),
        repo.rev_list(["HEAD"]).map(|_| ()),
        repo.name_rev("HEAD").map(|_| ()),
        repo.write_tree().map(|_| ()),
        repo.ls_files(Vec::<String>::new()).map(|_| ()),
        repo.status(no_paths()).map(|_| ()),
        repo.commit_log("HEAD").map(|_| ()),
        repo.list_unmerged().map(|_| ()),
        repo.list_changed_files(&["HEAD"], no_paths()).map(|_| ()),
        repo.prune(),
        repo.commit_tree(EMPTY_TREE, "msg", &[]).map(|_| ()),
    ];
    for result in failures {
        let err = result.unwrap_err();
        assert!(err.is_command_failure(), "{err:?}");
    }

    assert_eq!(repo.raw("gc", ["--auto"]).unwrap(), Some(1));
}

#[cfg(unix)]
#[test]
fn timeout_is_not_absence() {
    use std::os::unix::fs::PermissionsExt;
    use std::time::Duration;

    let tmp = TempDir::new().unwrap();
    let script = tmp.path().join("slow-git");
    fs::write(&script, "#!/bin/sh\nexec sleep 5\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let settings = gitrig::RunnerSettings {
        program: script,
        timeout: Some(Duration::from_millis(200)),
        ..gitrig::RunnerSettings::default()
    };
    let repo = Repository::open_with(fake_layout(tmp.path()), settings).unwrap();

    assert!(matches!(repo.rev_parse("HEAD"), Err(GitError::Timeout { .. })));
    assert!(matches!(repo.write_tree(), Err(GitError::Timeout { .. })));
}

#[test]
fn paths_outside_repository_are_rejected_before_spawning() {
    let tmp = TempDir::new().unwrap();
    let settings = gitrig::RunnerSettings {
        program: "/nonexistent/bin/git".into(),
        ..gitrig::RunnerSettings::default()
    };
    let repo = Repository::open_with(fake_layout(tmp.path()), settings).unwrap();

    let outside = tmp.path().join("outside.txt");
    let err = repo.add([&outside]).unwrap_err();
    assert!(matches!(err, GitError::PathOutsideRepository { .. }), "{err:?}");

    let err = repo.add(["inside.txt"]).unwrap_err();
    assert!(matches!(err, GitError::Spawn { .. }), "{err:?}");
}

#[test]
fn plumbing_commit_tree_and_empty_tree() {
    let (_tmp, repo) = init_repo();
    let head = commit_file(&repo, "a.txt", "a\n", "first");

    assert_eq!(repo.mktree_empty().unwrap(), EMPTY_TREE);

    let tree = repo.write_tree().unwrap();
    let commit = repo.commit_tree(&tree, "plumbed\n\nbody\n", &[&head]).unwrap();
    assert!(is_hex_id(&commit));
    assert_eq!(repo.commit_log(&commit).unwrap(), "plumbed\n\nbody");
    assert_eq!(repo.rev_list([&commit]).unwrap(), vec![commit.clone(), head]);

    let root = repo.commit_tree(EMPTY_TREE, "root", &[]).unwrap();
    assert_eq!(repo.rev_list([&root]).unwrap(), vec![root.clone()]);
}

#[test]
fn log_is_streamed_line_by_line() {
    let (_tmp, repo) = init_repo();
    commit_file(&repo, "a.txt", "1\n", "first");
    commit_file(&repo, "a.txt", "2\n", "second");
    commit_file(&repo, "a.txt", "3\n", "third");

    let lines: Vec<String> = repo
        .log(["--format=%s"])
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(lines, vec!["third", "second", "first"]);

    let mut stream = repo.log(["--format=%s"]).unwrap();
    assert_eq!(stream.next().unwrap().unwrap(), "third");
    stream.terminate().unwrap();

    let mut sink = Vec::new();
    repo.write_log(["--format=%s", "-n", "2"], &mut sink).unwrap();
    assert_eq!(String::from_utf8(sink).unwrap(), "third\nsecond\n");

    let stream = repo.log(["--not-a-real-option"]).unwrap();
    assert!(stream.finish().unwrap_err().is_command_failure());
}

#[test]
fn index_lock_blocks_git() {
    let (_tmp, repo) = init_repo();
    let path = write(&repo, "a.txt", "a\n");

    repo.set_index_lock(true).unwrap();
    let err = repo.add([&path]).unwrap_err();
    assert!(err.is_command_failure(), "{err:?}");

    repo.set_index_lock(false).unwrap();
    repo.add([&path]).unwrap();
}

#[test]
fn update_index_all_stages_modified_files() {
    let (_tmp, repo) = init_repo();
    commit_file(&repo, "a.txt", "a\n", "first");
    write(&repo, "a.txt", "changed content\n");

    assert_eq!(repo.status(no_paths()).unwrap(), vec![StatusEntry::new("M", "a.txt")]);
    assert_eq!(repo.raw("diff", ["--cached", "--quiet"]).unwrap(), None);

    repo.update_index_all().unwrap();
    assert_eq!(repo.raw("diff", ["--cached", "--quiet"]).unwrap(), Some(1));

    // Nothing left to refresh.
    repo.update_index_all().unwrap();
}

#[test]
fn branches_and_refs() {
    let (_tmp, repo) = init_repo();
    let head = commit_file(&repo, "a.txt", "a\n", "first");
    let main = current_branch(&repo);

    repo.branch(["topic"]).unwrap();
    let mut heads = repo.list_heads().unwrap();
    heads.sort();
    let mut expected = vec![main.clone(), "topic".to_string()];
    expected.sort();
    assert_eq!(heads, expected);

    repo.checkout(["topic"]).unwrap();
    assert_eq!(current_branch(&repo), "topic");
    repo.checkout([main.as_str()]).unwrap();
    repo.branch_delete("topic").unwrap();
    assert_eq!(repo.rev_parse("topic").unwrap(), None);

    assert_eq!(repo.raw("tag", ["v1.0"]).unwrap(), None);
    assert_eq!(repo.list_tags().unwrap(), vec!["v1.0"]);
    assert_eq!(repo.describe(["--tags", "HEAD"]).unwrap(), vec!["v1.0"]);
    repo.remove_tag("v1.0").unwrap();
    assert_eq!(repo.rev_parse("v1.0").unwrap(), None);

    repo.update_ref(["refs/heads/saved", head.as_str()]).unwrap();
    assert_eq!(repo.rev_parse("saved").unwrap(), Some(head));
}

#[test]
fn show_ref_with_several_matches_picks_the_first() {
    let (_tmp, repo) = init_repo();
    commit_file(&repo, "a.txt", "a\n", "first");
    let branch = current_branch(&repo);
    let tracking = format!("refs/remotes/origin/{branch}");
    repo.update_ref([tracking.as_str(), "HEAD"]).unwrap();

    assert_eq!(
        repo.show_ref(&branch).unwrap(),
        Some(format!("refs/heads/{branch}"))
    );
}

#[test]
fn reset_and_rm_cached() {
    let (_tmp, repo) = init_repo();
    commit_file(&repo, "a.txt", "a\n", "first");

    let b = write(&repo, "b.txt", "b\n");
    repo.add([&b]).unwrap();
    repo.reset(["-q"]).unwrap();
    assert_eq!(repo.status(no_paths()).unwrap(), vec![]);

    repo.rm_cached(repo.path().join("a.txt")).unwrap();
    assert_eq!(repo.status(no_paths()).unwrap(), vec![StatusEntry::new("D", "a.txt")]);
    assert!(repo.path().join("a.txt").exists());
}

#[test]
fn bare_repository_and_fetch() {
    let (tmp, work) = init_repo();
    let head = commit_file(&work, "a.txt", "a\n", "first");
    let branch = current_branch(&work);

    let bare = Repository::init_with(tmp.path().join("store.git"), true, settings()).unwrap();
    assert!(bare.is_bare());
    assert_eq!(bare.git_dir(), bare.path());

    bare.fetch(
        &work.path().display().to_string(),
        &format!("refs/heads/{branch}:refs/heads/{branch}"),
    )
    .unwrap();
    assert_eq!(bare.rev_parse(&branch).unwrap(), Some(head));
    assert_eq!(bare.list_heads().unwrap(), vec![branch]);
}

#[test]
fn alternates_share_objects() {
    let (tmp, source) = init_repo();
    let head = commit_file(&source, "a.txt", "a\n", "first");

    let borrower = Repository::init_with(tmp.path().join("borrower"), false, settings()).unwrap();
    assert_eq!(borrower.rev_parse(&format!("{head}^{{commit}}")).unwrap(), None);

    borrower.set_alternates(&source).unwrap();
    assert_eq!(borrower.cat_file(["-t", head.as_str()]).unwrap(), "commit");
}

#[test]
fn merge_and_merge_message() {
    let (_tmp, repo) = init_repo();
    commit_file(&repo, "a.txt", "base\n", "base");
    let main = current_branch(&repo);

    repo.checkout(["-q", "-b", "topic"]).unwrap();
    commit_file(&repo, "a.txt", "topic\n", "topic change");
    repo.checkout(["-q", main.as_str()]).unwrap();
    commit_file(&repo, "a.txt", "main\n", "main change");

    let err = repo.merge("topic").unwrap_err();
    assert!(err.is_command_failure());
    assert_eq!(repo.list_unmerged().unwrap(), vec!["a.txt"]);
    assert!(repo.merge_message().unwrap().unwrap().contains("topic"));

    repo.set_merge_message("resolved by test\n").unwrap();
    write(&repo, "a.txt", "resolved\n");
    repo.add(["a.txt"]).unwrap();
    repo.commit(no_paths(), None, CommitOptions::default())
        .unwrap();
    assert_eq!(repo.commit_log("HEAD").unwrap(), "resolved by test");
    assert!(repo.list_unmerged().unwrap().is_empty());
}

#[test]
fn is_repository_helper() {
    let (tmp, repo) = init_repo();
    assert!(Repository::is_repository(repo.path()));
    assert!(!Repository::is_repository(tmp.path()));
}
