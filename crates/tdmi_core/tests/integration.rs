mod emu_tests;
