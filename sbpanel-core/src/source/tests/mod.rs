mod tail_tests;
