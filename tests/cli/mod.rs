mod locator_test;
mod stream_test;
