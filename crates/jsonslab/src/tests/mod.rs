mod object_ops;
