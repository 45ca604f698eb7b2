mod support;

mod launcher_tests;

mod runner_tests;
