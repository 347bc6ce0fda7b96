mod generator_tests;
