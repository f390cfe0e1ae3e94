mod test_accept_call;
