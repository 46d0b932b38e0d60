//! Lives in its own test binary: it changes the process working directory.
#![cfg(unix)]

use std::env;

use kana_bench::{
    backend,
    suite::{BackendSpec, Suite},
};

#[test]
fn builtin_workers_start_from_any_directory() {
    let elsewhere = tempfile::tempdir().unwrap();
    env::set_current_dir(elsewhere.path()).unwrap();

    let suite = Suite::builtin();
    let mut checked = 0;
    for spec in &suite.backends {
        let BackendSpec::Worker {
            label,
            args,
            naming,
            working_dir,
            ..
        } = spec
        else {
            continue;
        };

        // Same directory and script path as the node worker, but only
        // reports ready when the script is reachable from there.
        let stand_in = BackendSpec::Worker {
            label: label.clone(),
            command: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                format!("test -f '{}' && echo '{{\"ready\":true}}'", args[0]),
            ],
            naming: *naming,
            working_dir: working_dir.clone(),
        };
        let worker = backend::build(&stand_in);
        assert!(worker.is_ok(), "{label}: {:?}", worker.err());
        checked += 1;
    }
    assert_eq!(checked, 3);
}
